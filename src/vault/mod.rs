//! Vault module: the encrypted credential container.
//!
//! This module provides:
//! - `Record` and its line encoding (`record`)
//! - The decrypted record blob (`plaintext`)
//! - Binary container layout and staged writes (`format`)
//! - The master password capability (`source`)
//! - High-level `Store` for read-modify-write cycles (`store`)

pub mod format;
pub mod plaintext;
pub mod record;
pub mod source;
pub mod store;

// Re-export the most commonly used items.
pub use format::FormatVersion;
pub use plaintext::{ParseMode, Plaintext};
pub use record::Record;
pub use source::SecretSource;
pub use store::{Store, StoreConfig, WriteOutcome, CONTAINER_FILE_NAME};
