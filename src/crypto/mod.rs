//! Cryptographic primitives for cropass.
//!
//! This module provides:
//! - AES-CBC-PKCS#7 encryption and decryption (`encryption`)
//! - Master password to key padding (`kdf`)
//! - The zeroizing key wrapper (`keys`)
//! - Random site password generation (`generate`)

pub mod encryption;
pub mod generate;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive, Cipher, generate_iv, ...};
pub use encryption::{generate_iv, Cipher, BLOCK_SIZE};
pub use generate::{generate_password, DEFAULT_PASSWORD_LEN};
pub use kdf::derive;
pub use keys::{DerivedKey, KEY_LEN};
