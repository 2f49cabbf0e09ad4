//! Mimic CLI Library
//!
//! Sample launcher around the mimic engine: loads a JSON class model, mimics
//! source classes onto destination classes and writes the model back.

pub mod commands;
pub mod config;

// CLI-specific error handling
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("{0}")]
        Model(#[from] mimic_core::Error),

        #[error("Mimic error: {0}")]
        Mimic(#[from] mimic_engine::MimicError),

        #[error("Invalid input: {0}")]
        InvalidInput(String),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
