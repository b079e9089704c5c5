//! One credential entry and its one-line text encoding.
//!
//! A record line is four whitespace-free fields separated by single
//! spaces and terminated by a newline:
//!
//! ```text
//! <site> <name> <secret> <created_at unix seconds>\n
//! ```

use zeroize::Zeroize;

use crate::errors::{CropassError, Result};

/// Number of fields on a record line.
const FIELD_COUNT: usize = 4;

/// A single credential entry.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Record {
    /// Site or service the credential belongs to (e.g. "github.com").
    pub site: String,

    /// User name on that site.
    pub name: String,

    /// The site password.
    pub secret: String,

    /// When the record was created, in Unix seconds.
    pub created_at: i64,
}

impl Record {
    /// Build a record, rejecting fields that are empty or contain
    /// whitespace (they would not survive a round-trip through a line).
    pub fn new(site: &str, name: &str, secret: &str, created_at: i64) -> Result<Self> {
        let record = Self {
            site: site.to_string(),
            name: name.to_string(),
            secret: secret.to_string(),
            created_at,
        };

        let fields = [site, name, secret];
        if fields.iter().any(|f| f.is_empty() || f.contains(char::is_whitespace)) {
            let found = fields.iter().map(|f| f.split_whitespace().count()).sum::<usize>() + 1;
            return Err(CropassError::MalformedRecord {
                line: 1,
                fields: found,
            });
        }

        Ok(record)
    }

    /// Encode as one newline-terminated line.
    pub fn encode(&self) -> String {
        format!(
            "{} {} {} {}\n",
            self.site, self.name, self.secret, self.created_at
        )
    }

    /// Decode one line (with or without its trailing newline).
    ///
    /// Errors report line 1; callers decoding a multi-line blob relabel
    /// them with [`CropassError::at_line`].
    ///
    /// Fields are split on runs of whitespace.  Exactly four fields are
    /// required and the fourth must be a base-10 integer.
    pub fn decode(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(CropassError::MalformedRecord {
                line: 1,
                fields: fields.len(),
            });
        }

        let created_at = fields[3]
            .parse::<i64>()
            .map_err(|_| CropassError::InvalidTimestamp(fields[3].to_string()))?;

        Ok(Self {
            site: fields[0].to_string(),
            name: fields[1].to_string(),
            secret: fields[2].to_string(),
            created_at,
        })
    }
}
