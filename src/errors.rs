use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in cropass.
#[derive(Debug, Error)]
pub enum CropassError {
    // --- Crypto errors ---
    #[error("Invalid key length {0}: AES keys must be 16, 24 or 32 bytes")]
    InvalidKeyLength(usize),

    #[error("Invalid IV length {0}: the IV must be exactly one 16-byte block")]
    InvalidIvLength(usize),

    #[error("Invalid ciphertext length {0}: must be a non-zero multiple of 16 bytes")]
    InvalidCiphertextLength(usize),

    // --- Container errors ---
    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    // --- Record errors ---
    #[error("Malformed record on line {line}: expected 4 fields, found {fields} (wrong master password?)")]
    MalformedRecord { line: usize, fields: usize },

    #[error("Invalid timestamp '{0}': the fourth field must be Unix seconds")]
    InvalidTimestamp(String),

    // --- Prompt errors ---
    #[error("Passwords do not match")]
    SecretMismatch,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl CropassError {
    /// Attach the 1-based line number of a record error.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedRecord { fields, .. } => Self::MalformedRecord { line, fields },
            other => other,
        }
    }
}

/// Convenience type alias for cropass results.
pub type Result<T> = std::result::Result<T, CropassError>;
