//! Random site passwords for the `new` command.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Default length of a generated site password.
pub const DEFAULT_PASSWORD_LEN: usize = 16;

/// Generate a random password of `len` characters from `[A-Za-z0-9]`.
///
/// The alphabet has no whitespace, so the result is always a valid
/// record field.
pub fn generate_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
