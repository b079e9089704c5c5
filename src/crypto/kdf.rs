//! Master password to AES-256 key.
//!
//! This is not a password hash: the password bytes are right-padded to
//! 32 bytes with PKCS#7-style bytes (each pad byte holds the pad length),
//! or cut to 32 bytes when longer.  No salt, no iterations.  Existing
//! containers depend on this exact mapping.

use super::keys::{DerivedKey, KEY_LEN};

/// Derive the 32-byte container key from a raw master password.
///
/// Passwords of 32 bytes or more are truncated to their first 32 bytes,
/// so two passwords sharing a 32-byte prefix open the same container.
pub fn derive(secret: &[u8]) -> DerivedKey {
    let mut bytes = [0u8; KEY_LEN];

    if secret.len() >= KEY_LEN {
        bytes.copy_from_slice(&secret[..KEY_LEN]);
    } else {
        let pad_len = KEY_LEN - secret.len();
        bytes[..secret.len()].copy_from_slice(secret);
        // pad_len < 32, fits in a byte
        bytes[secret.len()..].fill(pad_len as u8);
    }

    DerivedKey::new(bytes)
}
