// File: src/core/config.rs
use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings fixed when a `Dictionary` is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub output_directory: PathBuf,
    /// Word that stands in for out-of-vocabulary tokens; pronounced `spn`.
    pub oov_code: String,
    pub position_dependent_phones: bool,
    pub num_sil_states: usize,
    pub num_nonsil_states: usize,
    pub shared_silence_phones: bool,
    /// Silence insertion probability. Validated and stored, but no artifact
    /// consumes it yet.
    pub sil_prob: f64,
    /// Also emit `phones/extra_questions.txt`.
    pub extra_questions: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("dict"),
            oov_code: "<unk>".to_string(),
            position_dependent_phones: true,
            num_sil_states: 5,
            num_nonsil_states: 3,
            shared_silence_phones: false,
            sil_prob: 0.5,
            extra_questions: false,
        }
    }
}

impl DictionaryConfig {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON object whose fields override the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DictError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_sil_states < 2 {
            return Err(DictError::InvalidConfig(format!(
                "num_sil_states must be at least 2, got {}",
                self.num_sil_states
            )));
        }
        if self.num_nonsil_states < 1 {
            return Err(DictError::InvalidConfig(
                "num_nonsil_states must be at least 1".to_string(),
            ));
        }
        if self.oov_code.is_empty() || self.oov_code.chars().any(char::is_whitespace) {
            return Err(DictError::InvalidConfig(format!(
                "oov_code must be a single non-empty token, got {:?}",
                self.oov_code
            )));
        }
        if !(0.0..=1.0).contains(&self.sil_prob) {
            return Err(DictError::InvalidConfig(format!(
                "sil_prob must lie in [0, 1], got {}",
                self.sil_prob
            )));
        }
        Ok(())
    }
}
