//! The decrypted record blob.
//!
//! A plaintext is the newline-joined sequence of record lines held inside
//! a container.  It may be empty (no records yet).

use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use super::record::Record;
use crate::errors::Result;

/// How to treat lines that fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Abort on the first bad line.
    #[default]
    Strict,
    /// Skip bad lines with a warning.
    Lenient,
}

/// Decrypted container contents.  Wiped from memory on drop.
pub struct Plaintext {
    text: Zeroizing<String>,
}

impl Plaintext {
    /// An empty plaintext (first run, no container yet).
    pub fn empty() -> Self {
        Self {
            text: Zeroizing::new(String::new()),
        }
    }

    /// Wrap decrypted bytes.
    ///
    /// Invalid UTF-8 (typically the product of a wrong master password)
    /// is replaced lossily so it surfaces as record errors later.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let text = String::from_utf8(bytes).unwrap_or_else(|e| {
            let mut bad_bytes = e.into_bytes();
            let lossy = String::from_utf8_lossy(&bad_bytes).into_owned();
            bad_bytes.zeroize();
            lossy
        });
        Self {
            text: Zeroizing::new(text),
        }
    }

    /// Encode `records` one per line.
    pub fn from_records(records: &[Record]) -> Self {
        let mut text = String::new();
        for record in records {
            let mut line = record.encode();
            text.push_str(&line);
            line.zeroize();
        }
        Self {
            text: Zeroizing::new(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Decode every non-empty line into a [`Record`].
    pub fn records(&self, mode: ParseMode) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for (idx, line) in self.text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match Record::decode(line) {
                Ok(record) => records.push(record),
                Err(e) if mode == ParseMode::Lenient => {
                    warn!(line = idx + 1, error = %e, "skipping malformed record");
                }
                Err(e) => return Err(e.at_line(idx + 1)),
            }
        }

        Ok(records)
    }
}
