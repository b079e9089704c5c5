//! Where master passwords come from.
//!
//! The store never talks to the terminal itself; it asks a
//! [`SecretSource`] supplied by the caller.  The CLI provides an
//! interactive implementation, tests provide fixed values.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::{CropassError, Result};

/// Supplies the master password for one command.
pub trait SecretSource {
    /// Read the master password once (read-only commands).
    fn read_secret(&mut self) -> Result<Zeroizing<Vec<u8>>>;

    /// Read the master password twice and require both entries to match
    /// (mutating commands).  Fails with `SecretMismatch` otherwise.
    fn read_secret_confirmed(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Compare two entries in constant time.
///
/// Returns the first entry when they match.
pub fn confirm(first: Zeroizing<Vec<u8>>, second: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if bool::from(first.as_slice().ct_eq(second)) {
        Ok(first)
    } else {
        Err(CropassError::SecretMismatch)
    }
}
