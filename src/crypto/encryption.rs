//! AES-CBC encryption with PKCS#7 padding.
//!
//! The cipher carries no authentication tag: a wrong key or a flipped
//! ciphertext byte decrypts to garbage instead of failing.  This matches
//! the on-disk format already in use and must not be changed without a
//! format version bump.
//!
//! Unpadding trusts the final byte and does not check the other padding
//! bytes.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{CropassError, Result};

/// AES block size in bytes; also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Raw AES key, sized by variant.
enum AesKey {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

impl AesKey {
    fn from_slice(key: &[u8]) -> Result<Self> {
        let sized = match key.len() {
            16 => key.try_into().map(Self::Aes128),
            24 => key.try_into().map(Self::Aes192),
            32 => key.try_into().map(Self::Aes256),
            other => return Err(CropassError::InvalidKeyLength(other)),
        };
        sized.map_err(|_| CropassError::InvalidKeyLength(key.len()))
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        match self {
            Self::Aes128(k) => k.zeroize(),
            Self::Aes192(k) => k.zeroize(),
            Self::Aes256(k) => k.zeroize(),
        }
    }
}

/// AES-CBC-PKCS#7 cipher bound to one key and one IV.
pub struct Cipher {
    key: AesKey,
    iv: [u8; BLOCK_SIZE],
}

impl Cipher {
    /// Build a cipher from a 16/24/32-byte key and a 16-byte IV.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key = AesKey::from_slice(key)?;
        let iv: [u8; BLOCK_SIZE] = iv
            .try_into()
            .map_err(|_| CropassError::InvalidIvLength(iv.len()))?;
        Ok(Self { key, iv })
    }

    /// Pad `plaintext` with PKCS#7 and encrypt it.
    ///
    /// The output is always a non-empty multiple of [`BLOCK_SIZE`]; input
    /// that is already block-aligned gains a full padding block.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        match &self.key {
            AesKey::Aes128(k) => cbc::Encryptor::<Aes128>::new(k.into(), (&self.iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            AesKey::Aes192(k) => cbc::Encryptor::<Aes192>::new(k.into(), (&self.iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            AesKey::Aes256(k) => cbc::Encryptor::<Aes256>::new(k.into(), (&self.iv).into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        }
    }

    /// Decrypt `ciphertext` and strip the PKCS#7 padding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CropassError::InvalidCiphertextLength(ciphertext.len()));
        }

        let decrypted = match &self.key {
            AesKey::Aes128(k) => cbc::Decryptor::<Aes128>::new(k.into(), (&self.iv).into())
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext),
            AesKey::Aes192(k) => cbc::Decryptor::<Aes192>::new(k.into(), (&self.iv).into())
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext),
            AesKey::Aes256(k) => cbc::Decryptor::<Aes256>::new(k.into(), (&self.iv).into())
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext),
        }
        .map_err(|_| CropassError::InvalidCiphertextLength(ciphertext.len()))?;

        Ok(unpad(decrypted))
    }
}

/// Drop `n` trailing bytes, where `n` is the value of the last byte.
///
/// A pad length larger than the buffer leaves the buffer untouched.
fn unpad(mut buf: Vec<u8>) -> Vec<u8> {
    if let Some(&last) = buf.last() {
        let pad = usize::from(last);
        if pad <= buf.len() {
            buf.truncate(buf.len() - pad);
        }
    }
    buf
}

/// Generate a fresh random IV.
pub fn generate_iv() -> [u8; BLOCK_SIZE] {
    let mut iv = [0u8; BLOCK_SIZE];
    rand::rng().fill_bytes(&mut iv);
    iv
}
