//! End-to-end checks: build from a file on disk, write every artifact, and
//! inspect the output tree.

use lexicon_core::writer;
use lexicon_core::{DictError, Dictionary, DictionaryConfig};
use std::fs;
use std::path::{Path, PathBuf};

const INPUT: &str = "\
CAT k ae t
a ah
a ey

dog d ao g
the dh ah
the dh iy
";

const ALL_ARTIFACTS: [&str; 13] = [
    writer::GRAPHEMES,
    writer::LEXICON,
    writer::LEXICONP,
    writer::PHONE_MAP,
    writer::PHONES,
    writer::WORDS,
    writer::TOPO,
    writer::WORD_BOUNDARY,
    writer::SETS,
    writer::ROOTS,
    writer::SILENCE,
    writer::NONSILENCE,
    writer::CONTEXT_INDEP,
];

fn write_input(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("lexicon_in.txt");
    fs::write(&path, text).unwrap();
    path
}

fn build_and_write(input: &Path, config: DictionaryConfig) -> Dictionary {
    let dict = Dictionary::new(input, config).unwrap();
    dict.write().unwrap();
    dict
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

#[test]
fn writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    for name in ALL_ARTIFACTS {
        assert!(out.join(name).is_file(), "missing {}", name);
    }
    assert!(!out.join(writer::EXTRA_QUESTIONS).exists());
}

#[test]
fn lexicon_matches_expected_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    assert_eq!(
        read(&out, writer::LEXICON),
        "!SIL\tsil_S\n\
<unk>\tspn_S\n\
a\tah_S\n\
a\tey_S\n\
cat\tk_B ae_I t_E\n\
dog\td_B ao_I g_E\n\
the\tdh_B ah_E\n\
the\tdh_B iy_E\n"
    );
    assert!(read(&out, writer::LEXICONP).contains("cat\t1.0\tk_B ae_I t_E\n"));
    assert_eq!(read(&out, writer::GRAPHEMES), "a\nc\nd\ne\ng\nh\no\nt\n");
}

#[test]
fn symbol_tables_are_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    for name in [writer::PHONES, writer::WORDS] {
        let text = read(&out, name);
        for (expected, line) in text.lines().enumerate() {
            let id: usize = line.rsplit(' ').next().unwrap().parse().unwrap();
            assert_eq!(id, expected, "{}: {}", name, line);
        }
        assert!(text.starts_with("<eps> 0\n"));
    }

    let words = read(&out, writer::WORDS);
    let tail: Vec<&str> = words.lines().rev().take(3).collect();
    assert_eq!(tail, vec!["</s> 9", "<s> 8", "#0 7"]);
}

#[test]
fn context_indep_copies_silence() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    assert_eq!(
        read(&out, writer::CONTEXT_INDEP),
        read(&out, writer::SILENCE)
    );
}

#[test]
fn topo_uses_configured_state_counts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    let config = DictionaryConfig {
        num_sil_states: 4,
        num_nonsil_states: 2,
        ..DictionaryConfig::new(&out)
    };
    build_and_write(&input, config);

    let topo = read(&out, writer::TOPO);
    assert!(topo.contains("<State> 2 </State>\n</TopologyEntry>"));
    assert!(topo.contains(
        "<State> 0 <PdfClass> 0 <Transition> 0 0.3333333333333333 \
<Transition> 1 0.3333333333333333 <Transition> 2 0.3333333333333333 </State>"
    ));
    assert!(topo.contains("<State> 3 <PdfClass> 3 <Transition> 3 0.75 <Transition> 4 0.25 </State>"));
    assert!(topo.ends_with("<State> 4 </State>\n</TopologyEntry>\n</Topology>\n"));
}

#[test]
fn rerun_is_byte_identical_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    build_and_write(&input, DictionaryConfig::new(&first));
    build_and_write(&input, DictionaryConfig::new(&second));
    fs::write(second.join(writer::LEXICON), "stale\n").unwrap();
    build_and_write(&input, DictionaryConfig::new(&second));

    for name in ALL_ARTIFACTS {
        assert_eq!(
            fs::read(first.join(name)).unwrap(),
            fs::read(second.join(name)).unwrap(),
            "{} differs between runs",
            name
        );
    }
}

#[cfg(unix)]
#[test]
fn artifacts_are_readable_by_group_and_others() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    for name in ALL_ARTIFACTS {
        let mode = fs::metadata(out.join(name)).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644, "{} has mode {:o}", name, mode);
    }
}

#[test]
fn reserved_words_keep_word_table_tail() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "<s> sil\na ah\n");
    let out = dir.path().join("dict");
    build_and_write(&input, DictionaryConfig::new(&out));

    assert_eq!(
        read(&out, writer::WORDS),
        "<eps> 0\n!SIL 1\n<unk> 2\na 3\n#0 4\n<s> 5\n</s> 6\n"
    );
}

#[test]
fn extra_questions_written_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "a ah\n");
    let out = dir.path().join("dict");
    let config = DictionaryConfig {
        extra_questions: true,
        ..DictionaryConfig::new(&out)
    };
    build_and_write(&input, config);

    let text = read(&out, writer::EXTRA_QUESTIONS);
    assert_eq!(text.lines().count(), 11);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"position_dependent_phones": false, "shared_silence_phones": true}"#)
        .unwrap();
    let config = DictionaryConfig::from_json_file(&path).unwrap();
    assert!(!config.position_dependent_phones);
    assert!(config.shared_silence_phones);
    assert_eq!(config.num_sil_states, 5);

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        DictionaryConfig::from_json_file(&path),
        Err(DictError::ConfigFormat(_))
    ));
}

#[test]
fn invalid_config_is_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), INPUT);
    let config = DictionaryConfig {
        num_sil_states: 1,
        ..DictionaryConfig::new(dir.path().join("dict"))
    };
    assert!(matches!(
        Dictionary::new(&input, config),
        Err(DictError::InvalidConfig(_))
    ));
}
