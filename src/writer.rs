// File: src/writer.rs
//! Renders a built [`Dictionary`] into the text artifacts expected by the
//! acoustic-model training recipes.
//!
//! Every artifact has a `write_*` routine that renders into any `Write`, so
//! the exact bytes can be checked without touching disk. [`write_all`] routes
//! each of them through [`emit`], which stages the output in a temporary file
//! next to the destination and renames it into place.

use crate::core::dictionary::Dictionary;
use crate::core::types::{annotate, Position, Pronunciation, WordBoundary, EPSILON};
use crate::error::{DictError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const GRAPHEMES: &str = "graphemes.txt";
pub const LEXICON: &str = "lexicon.txt";
pub const LEXICONP: &str = "lexiconp.txt";
pub const PHONE_MAP: &str = "phone_map.txt";
pub const PHONES: &str = "phones.txt";
pub const WORDS: &str = "words.txt";
pub const TOPO: &str = "topo";
pub const WORD_BOUNDARY: &str = "phones/word_boundary.txt";
pub const SETS: &str = "phones/sets.txt";
pub const ROOTS: &str = "phones/roots.txt";
pub const SILENCE: &str = "phones/silence.txt";
pub const NONSILENCE: &str = "phones/nonsilence.txt";
pub const CONTEXT_INDEP: &str = "phones/context_indep.txt";
pub const EXTRA_QUESTIONS: &str = "phones/extra_questions.txt";

/// Artifacts are read by training jobs that may run as another user.
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

const SHARED_SPLIT: &str = "shared split";
const NOT_SHARED_NOT_SPLIT: &str = "not-shared not-split";

/// Writes every artifact into the dictionary's output directory, replacing
/// whatever a previous run left there.
pub fn write_all(dict: &Dictionary) -> Result<()> {
    let root = dict.output_directory();
    info!(output = %root.display(), "writing dictionary artifacts");

    emit(&root.join(LEXICON), |w| write_lexicon(dict, w))?;
    emit(&root.join(LEXICONP), |w| write_lexiconp(dict, w))?;
    emit(&root.join(GRAPHEMES), |w| write_graphemes(dict, w))?;
    emit(&root.join(PHONE_MAP), |w| write_phone_map(dict, w))?;

    emit(&root.join(SETS), |w| write_sets(dict, w))?;
    emit(&root.join(ROOTS), |w| write_roots(dict, w))?;
    emit(&root.join(SILENCE), |w| write_silence(dict, w))?;
    emit(&root.join(NONSILENCE), |w| write_nonsilence(dict, w))?;
    let context_indep = root.join(CONTEXT_INDEP);
    fs::copy(root.join(SILENCE), &context_indep)
        .map_err(|e| DictError::io(&context_indep, e))?;

    emit(&root.join(PHONES), |w| write_phone_symbols(dict, w))?;
    emit(&root.join(TOPO), |w| write_topo(dict, w))?;
    emit(&root.join(WORD_BOUNDARY), |w| write_word_boundaries(dict, w))?;
    emit(&root.join(WORDS), |w| write_word_symbols(dict, w))?;

    if dict.config().extra_questions {
        emit(&root.join(EXTRA_QUESTIONS), |w| write_extra_questions(dict, w))?;
    }
    Ok(())
}

/// Renders one artifact through a temp file in the destination directory and
/// atomically persists it over `path`.
pub fn emit<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> io::Result<()>,
{
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| DictError::io(path, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        render(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| DictError::io(path, e))?;
    }
    set_artifact_permissions(temp_file.as_file()).map_err(|e| DictError::io(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| DictError::io(path, e.error))?;
    debug!(artifact = %path.display(), "written");
    Ok(())
}

/// Temp files start out owner-only; widen them before they take the
/// artifact's name.
#[cfg(unix)]
fn set_artifact_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(ARTIFACT_MODE))
}

#[cfg(not(unix))]
fn set_artifact_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Pronunciations of a word in sorted order, duplicates kept.
fn sorted_prons(prons: &[Pronunciation]) -> Vec<&Pronunciation> {
    let mut sorted: Vec<&Pronunciation> = prons.iter().collect();
    sorted.sort();
    sorted
}

/// The bare phone followed by its four positional variants, or just the bare
/// phone when position-dependent phones are off.
fn with_variants(phone: &str, position_dependent: bool) -> Vec<String> {
    let mut group = vec![phone.to_string()];
    if position_dependent {
        group.extend(Position::ALL.iter().map(|pos| pos.tag(phone)));
    }
    group
}

/// Only the positional variants, or the bare phone when position-dependent
/// phones are off.
fn variants_only(phone: &str, position_dependent: bool) -> Vec<String> {
    if position_dependent {
        Position::ALL.iter().map(|pos| pos.tag(phone)).collect()
    } else {
        vec![phone.to_string()]
    }
}

/// Silence phones list their bare form twice so the bare symbol maps onto
/// itself as well as onto every variant.
fn silence_map_entry(phone: &str, position_dependent: bool) -> Vec<String> {
    let mut entry = with_variants(phone, position_dependent);
    if position_dependent {
        entry.insert(0, phone.to_string());
    }
    entry
}

pub fn write_graphemes<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    for grapheme in dict.graphemes() {
        writeln!(out, "{}", grapheme)?;
    }
    Ok(())
}

pub fn write_lexicon<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    for (word, prons) in dict.words() {
        for pron in sorted_prons(prons) {
            let phones = annotate(pron, dict.position_dependent());
            writeln!(out, "{}\t{}", word, phones.join(" "))?;
        }
    }
    Ok(())
}

pub fn write_lexiconp<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    for (word, prons) in dict.words() {
        for pron in sorted_prons(prons) {
            let phones = annotate(pron, dict.position_dependent());
            writeln!(out, "{}\t1.0\t{}", word, phones.join(" "))?;
        }
    }
    Ok(())
}

pub fn write_phone_map<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    for phone in dict.silence_phones() {
        writeln!(out, "{}", silence_map_entry(phone, pd).join(" "))?;
    }
    for phone in dict.nonsilence_phones() {
        writeln!(out, "{}", with_variants(phone, pd).join(" "))?;
    }
    Ok(())
}

pub fn write_phone_symbols<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    for (phone, id) in dict.phone_table().iter() {
        writeln!(out, "{} {}", phone, id)?;
    }
    Ok(())
}

pub fn write_word_symbols<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    for (word, id) in dict.word_table().iter() {
        writeln!(out, "{} {}", word, id)?;
    }
    Ok(())
}

pub fn write_topo<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    write!(out, "{}", dict.topology())
}

/// Empty in position-independent mode: no symbol carries a position.
pub fn write_word_boundaries<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    if !dict.position_dependent() {
        return Ok(());
    }
    for (phone, _) in dict.phone_table().iter() {
        if phone == EPSILON {
            continue;
        }
        writeln!(out, "{} {}", phone, WordBoundary::of_symbol(phone))?;
    }
    Ok(())
}

pub fn write_sets<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    for phone in dict.silence_phones() {
        writeln!(out, "{}", with_variants(phone, pd).join(" "))?;
    }
    for phone in dict.nonsilence_phones() {
        writeln!(out, "{}", variants_only(phone, pd).join(" "))?;
    }
    Ok(())
}

pub fn write_roots<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    let first_tag = if dict.config().shared_silence_phones {
        NOT_SHARED_NOT_SPLIT
    } else {
        SHARED_SPLIT
    };
    for (i, phone) in dict.silence_phones().iter().enumerate() {
        let tag = if i == 0 { first_tag } else { SHARED_SPLIT };
        writeln!(out, "{} {}", tag, with_variants(phone, pd).join(" "))?;
    }
    for phone in dict.nonsilence_phones() {
        writeln!(out, "{} {}", SHARED_SPLIT, variants_only(phone, pd).join(" "))?;
    }
    Ok(())
}

pub fn write_silence<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    for phone in dict.silence_phones() {
        for symbol in with_variants(phone, pd) {
            writeln!(out, "{}", symbol)?;
        }
    }
    Ok(())
}

pub fn write_nonsilence<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    for phone in dict.nonsilence_phones() {
        for symbol in variants_only(phone, pd) {
            writeln!(out, "{}", symbol)?;
        }
    }
    Ok(())
}

pub fn write_extra_questions<W: Write>(dict: &Dictionary, out: &mut W) -> io::Result<()> {
    let pd = dict.position_dependent();
    let sils: Vec<String> = dict
        .silence_phones()
        .iter()
        .flat_map(|p| silence_map_entry(p, pd))
        .collect();
    writeln!(out, "{}", sils.join(" "))?;

    let nonsils: Vec<String> = dict
        .nonsilence_phones()
        .iter()
        .flat_map(|p| with_variants(p, pd))
        .collect();
    writeln!(out, "{}", nonsils.join(" "))?;

    for pos in Position::ALL {
        let line: Vec<String> = dict.nonsilence_phones().iter().map(|p| pos.tag(p)).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    let bare: Vec<&str> = dict.silence_phones().iter().map(String::as_str).collect();
    writeln!(out, "{}", bare.join(" "))?;
    for pos in Position::ALL {
        let line: Vec<String> = dict.silence_phones().iter().map(|p| pos.tag(p)).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}
