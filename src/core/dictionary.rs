use crate::core::config::DictionaryConfig;
use crate::core::symbols::SymbolTable;
use crate::core::topology::Topology;
use crate::core::types::{
    Position, Pronunciation, EPSILON, OPTIONAL_SILENCE, SILENCE_WORD, SPOKEN_NOISE,
    WORD_TABLE_TAIL,
};
use crate::error::{DictError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Accumulates pronunciations during the single read pass over the input.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    words: BTreeMap<String, Vec<Pronunciation>>,
    nonsilence_phones: BTreeSet<String>,
    graphemes: BTreeSet<char>,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one `word phone1 phone2 ...` line. Blank lines are ignored.
    pub fn add_line(&mut self, line: &str) {
        let mut fields = line.split_whitespace();
        let word = match fields.next() {
            Some(word) => word.to_lowercase(),
            None => return,
        };
        let pron: Pronunciation = fields.map(str::to_string).collect();
        if pron.is_empty() {
            warn!(word = %word, "pronunciation has no phones");
        }

        self.graphemes.extend(word.chars());
        self.nonsilence_phones.extend(pron.iter().cloned());
        self.words.entry(word).or_default().push(pron);
    }

    /// Injects the silence and OOV entries and derives the id tables.
    /// Fails if `config` does not pass [`DictionaryConfig::validate`].
    pub fn finish(mut self, config: DictionaryConfig) -> Result<Dictionary> {
        config.validate()?;
        self.words
            .entry(SILENCE_WORD.to_string())
            .or_default()
            .push(vec![OPTIONAL_SILENCE.to_string()]);
        self.words
            .entry(config.oov_code.clone())
            .or_default()
            .push(vec![SPOKEN_NOISE.to_string()]);

        let silence_phones: BTreeSet<String> = [OPTIONAL_SILENCE, SPOKEN_NOISE]
            .iter()
            .map(|p| p.to_string())
            .collect();
        let disambiguation_symbols = BTreeSet::new();

        let phone_table = build_phone_table(
            &silence_phones,
            &self.nonsilence_phones,
            &disambiguation_symbols,
            config.position_dependent_phones,
        );
        let word_table = build_word_table(&self.words);
        let topology = Topology::new(
            self.nonsilence_phones.iter().cloned().collect(),
            config.num_nonsil_states,
            silence_phones.iter().cloned().collect(),
            config.num_sil_states,
        );

        let dictionary = Dictionary {
            config,
            words: self.words,
            silence_phones,
            nonsilence_phones: self.nonsilence_phones,
            disambiguation_symbols,
            optional_silence: OPTIONAL_SILENCE.to_string(),
            graphemes: self.graphemes,
            phone_table,
            word_table,
            topology,
        };

        let overlap = dictionary.overlapping_phones();
        if !overlap.is_empty() {
            warn!(phones = ?overlap, "phones appear in both silence and nonsilence sets");
        }
        info!(
            words = dictionary.words.len(),
            phones = dictionary.phone_table.len(),
            graphemes = dictionary.graphemes.len(),
            "dictionary built"
        );
        Ok(dictionary)
    }
}

fn build_phone_table(
    silence: &BTreeSet<String>,
    nonsilence: &BTreeSet<String>,
    disambig: &BTreeSet<String>,
    position_dependent: bool,
) -> SymbolTable {
    let mut table = SymbolTable::new();
    table.push(EPSILON);
    for phone in silence.iter().chain(nonsilence).chain(disambig) {
        if !position_dependent {
            table.push(phone.as_str());
            continue;
        }
        if silence.contains(phone) {
            table.push(phone.as_str());
        }
        for pos in Position::ALL {
            table.push(pos.tag(phone));
        }
    }
    table
}

fn build_word_table(words: &BTreeMap<String, Vec<Pronunciation>>) -> SymbolTable {
    let mut table = SymbolTable::new();
    table.push(EPSILON);
    // Reserved symbols always take the last three ids, even when the input
    // spells one of them as a word.
    for word in words.keys() {
        if WORD_TABLE_TAIL.contains(&word.as_str()) {
            continue;
        }
        table.push(word.as_str());
    }
    for symbol in WORD_TABLE_TAIL {
        table.push(symbol);
    }
    table
}

/// The built lexicon together with its phone inventories and symbol tables.
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Dictionary {
    config: DictionaryConfig,
    words: BTreeMap<String, Vec<Pronunciation>>,
    silence_phones: BTreeSet<String>,
    nonsilence_phones: BTreeSet<String>,
    disambiguation_symbols: BTreeSet<String>,
    optional_silence: String,
    graphemes: BTreeSet<char>,
    phone_table: SymbolTable,
    word_table: SymbolTable,
    topology: Topology,
}

impl Dictionary {
    /// Creates `<output>/phones`, then reads the pronunciation file at
    /// `input_path`. Fails if either step fails.
    ///
    /// The configuration is validated before anything touches the disk, so a
    /// rejected configuration leaves no output tree behind.
    pub fn new(input_path: impl AsRef<Path>, config: DictionaryConfig) -> Result<Self> {
        let input_path = input_path.as_ref();
        config.validate()?;
        create_phones_dir(&config)?;

        info!(input = %input_path.display(), "reading pronunciations");
        let file = File::open(input_path).map_err(|e| DictError::io(input_path, e))?;
        read_lines(BufReader::new(file), input_path, config)
    }

    /// Like [`Dictionary::new`], with the pronunciations taken from `reader`.
    pub fn from_reader<R: BufRead>(reader: R, config: DictionaryConfig) -> Result<Self> {
        config.validate()?;
        create_phones_dir(&config)?;
        read_lines(reader, Path::new("<reader>"), config)
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn output_directory(&self) -> &Path {
        &self.config.output_directory
    }

    pub fn phones_dir(&self) -> PathBuf {
        self.config.output_directory.join("phones")
    }

    pub fn position_dependent(&self) -> bool {
        self.config.position_dependent_phones
    }

    /// Words in sorted order, each with its pronunciations in input order.
    pub fn words(&self) -> &BTreeMap<String, Vec<Pronunciation>> {
        &self.words
    }

    pub fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn silence_phones(&self) -> &BTreeSet<String> {
        &self.silence_phones
    }

    pub fn nonsilence_phones(&self) -> &BTreeSet<String> {
        &self.nonsilence_phones
    }

    pub fn disambiguation_symbols(&self) -> &BTreeSet<String> {
        &self.disambiguation_symbols
    }

    pub fn optional_silence(&self) -> &str {
        &self.optional_silence
    }

    pub fn graphemes(&self) -> &BTreeSet<char> {
        &self.graphemes
    }

    pub fn phone_table(&self) -> &SymbolTable {
        &self.phone_table
    }

    pub fn word_table(&self) -> &SymbolTable {
        &self.word_table
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Phones listed as both silence and nonsilence. Empty for well-formed
    /// input; nothing downstream rejects a non-empty result.
    pub fn overlapping_phones(&self) -> BTreeSet<String> {
        self.silence_phones
            .intersection(&self.nonsilence_phones)
            .cloned()
            .collect()
    }

    /// Writes every artifact under the output directory.
    pub fn write(&self) -> Result<()> {
        crate::writer::write_all(self)
    }
}

fn create_phones_dir(config: &DictionaryConfig) -> Result<()> {
    let phones_dir = config.output_directory.join("phones");
    fs::create_dir_all(&phones_dir).map_err(|e| DictError::io(&phones_dir, e))?;
    debug!(dir = %phones_dir.display(), "output directory ready");
    Ok(())
}

fn read_lines<R: BufRead>(
    reader: R,
    source: &Path,
    config: DictionaryConfig,
) -> Result<Dictionary> {
    let mut builder = DictionaryBuilder::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => DictError::Encoding {
                path: source.to_path_buf(),
                line: index + 1,
            },
            _ => DictError::io(source, e),
        })?;
        // A lone carriage return also ends a line.
        for part in line.split('\r') {
            builder.add_line(part);
        }
    }
    builder.finish(config)
}
