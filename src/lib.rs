// src/lib.rs

pub mod core;
pub mod error;
pub mod writer;
pub use crate::core::config::DictionaryConfig;
pub use crate::core::dictionary::{Dictionary, DictionaryBuilder};
pub use crate::error::{DictError, Result};
