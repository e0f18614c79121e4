// src/core/types.rs
use std::fmt;

/// Integer identifier of a phone symbol in `phones.txt`.
pub type PhoneId = u32;

/// Integer identifier of a word symbol in `words.txt`.
pub type WordId = u32;

/// One pronunciation variant: the phones of a word, in order.
pub type Pronunciation = Vec<String>;

pub const EPSILON: &str = "<eps>";
pub const SILENCE_WORD: &str = "!SIL";
pub const OPTIONAL_SILENCE: &str = "sil";
pub const SPOKEN_NOISE: &str = "spn";

/// Symbols appended to the word table after every lexicon word.
pub const WORD_TABLE_TAIL: [&str; 3] = ["#0", "<s>", "</s>"];

/// Where a phone sits inside a word's pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Begin,
    End,
    Internal,
    Singleton,
}

impl Position {
    /// Suffix order used by every table that expands a base phone.
    pub const ALL: [Position; 4] = [
        Position::Begin,
        Position::End,
        Position::Internal,
        Position::Singleton,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Position::Begin => "_B",
            Position::End => "_E",
            Position::Internal => "_I",
            Position::Singleton => "_S",
        }
    }

    /// Position of the phone at `index` in a pronunciation of `len` phones.
    pub fn of(index: usize, len: usize) -> Self {
        if len == 1 {
            Position::Singleton
        } else if index == 0 {
            Position::Begin
        } else if index == len - 1 {
            Position::End
        } else {
            Position::Internal
        }
    }

    pub fn tag(self, phone: &str) -> String {
        format!("{}{}", phone, self.suffix())
    }
}

/// Category of a phone symbol in `phones/word_boundary.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBoundary {
    Begin,
    End,
    Internal,
    Singleton,
    Nonword,
}

impl WordBoundary {
    /// Classifies a phone symbol by its positional suffix.
    pub fn of_symbol(symbol: &str) -> Self {
        if symbol.ends_with("_B") {
            WordBoundary::Begin
        } else if symbol.ends_with("_S") {
            WordBoundary::Singleton
        } else if symbol.ends_with("_I") {
            WordBoundary::Internal
        } else if symbol.ends_with("_E") {
            WordBoundary::End
        } else {
            WordBoundary::Nonword
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordBoundary::Begin => "begin",
            WordBoundary::End => "end",
            WordBoundary::Internal => "internal",
            WordBoundary::Singleton => "singleton",
            WordBoundary::Nonword => "nonword",
        }
    }
}

impl fmt::Display for WordBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the phones of `pron` with positional suffixes attached when
/// `position_dependent` is set, or unchanged otherwise.
pub fn annotate(pron: &[String], position_dependent: bool) -> Vec<String> {
    if !position_dependent {
        return pron.to_vec();
    }
    pron.iter()
        .enumerate()
        .map(|(i, phone)| Position::of(i, pron.len()).tag(phone))
        .collect()
}
