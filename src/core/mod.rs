pub mod config;
pub mod dictionary;
pub mod symbols;
pub mod topology;
pub mod types;
