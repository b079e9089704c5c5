//! Binary container layout.
//!
//! A container file has this layout:
//!
//! ```text
//! [magic "CRP00000": 8 bytes][AES-CBC-PKCS#7 ciphertext: N bytes][IV: 16 bytes]
//! ```
//!
//! - **Magic**: identifies the format version.  Legacy containers have no
//!   magic at all and start directly with the ciphertext.
//! - **Ciphertext**: `N` is a non-zero multiple of the AES block size.
//! - **IV**: always the trailing 16 bytes, stored in the clear.
//!
//! Because `N` is block-aligned, a current container is always 8 bytes
//! off a block boundary while a legacy one is exactly on it.  Layouts are
//! tried in a fixed order: current, then legacy.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crypto::BLOCK_SIZE;
use crate::errors::{CropassError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every current-format container.
pub const MAGIC: &[u8; HEADER_LEN] = b"CRP00000";

/// Length of the magic header.
pub const HEADER_LEN: usize = 8;

/// Length of the trailing IV.
pub const IV_LEN: usize = BLOCK_SIZE;

// ---------------------------------------------------------------------------
// Format versions
// ---------------------------------------------------------------------------

/// The container layouts this build understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// `CRP00000` header, ciphertext, IV.
    Current,
    /// Ciphertext, IV; written by releases that predate the header.
    Legacy,
}

impl FormatVersion {
    /// Candidate layouts, in the order they are tried when reading.
    pub const READ_ORDER: [FormatVersion; 2] = [FormatVersion::Current, FormatVersion::Legacy];

    /// Offset of the ciphertext within the file.
    pub fn header_len(self) -> usize {
        match self {
            Self::Current => HEADER_LEN,
            Self::Legacy => 0,
        }
    }

    /// Whether `data` has exactly this layout's shape.
    fn matches(self, data: &[u8]) -> bool {
        let overhead = self.header_len() + IV_LEN;
        if data.len() < overhead + BLOCK_SIZE || (data.len() - overhead) % BLOCK_SIZE != 0 {
            return false;
        }
        match self {
            Self::Current => data.starts_with(MAGIC),
            Self::Legacy => true,
        }
    }
}

/// A container split into its parts.
#[derive(Debug)]
pub struct Unframed<'a> {
    pub version: FormatVersion,
    pub ciphertext: &'a [u8],
    pub iv: [u8; IV_LEN],
}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Assemble a current-format container: magic, ciphertext, IV.
pub fn frame(ciphertext: &[u8], iv: &[u8; IV_LEN]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + ciphertext.len() + IV_LEN);
    buf.extend_from_slice(MAGIC); // 8 bytes
    buf.extend_from_slice(ciphertext); // N bytes
    buf.extend_from_slice(iv); // 16 bytes
    buf
}

/// Split container bytes into ciphertext and IV.
///
/// Header-less containers are only accepted when `allow_legacy` is set.
/// A block-misaligned body, or a header that is not ours, is rejected
/// before any decryption is attempted.
pub fn unframe(data: &[u8], allow_legacy: bool) -> Result<Unframed<'_>> {
    let version = FormatVersion::READ_ORDER
        .into_iter()
        .filter(|v| allow_legacy || *v != FormatVersion::Legacy)
        .find(|v| v.matches(data))
        .ok_or_else(|| reject(data, allow_legacy))?;

    let iv_start = data.len() - IV_LEN;
    let ciphertext = &data[version.header_len()..iv_start];
    let iv: [u8; IV_LEN] = data[iv_start..]
        .try_into()
        .map_err(|_| CropassError::InvalidIvLength(data.len() - iv_start))?;

    debug!(?version, ciphertext_len = ciphertext.len(), "unframed container");

    Ok(Unframed {
        version,
        ciphertext,
        iv,
    })
}

/// Pick the error for bytes that match no accepted layout.
fn reject(data: &[u8], allow_legacy: bool) -> CropassError {
    let body_len = data.len().saturating_sub(IV_LEN);
    if data.starts_with(MAGIC) {
        return CropassError::InvalidCiphertextLength(body_len.saturating_sub(HEADER_LEN));
    }
    if data.len() > IV_LEN && body_len % BLOCK_SIZE == HEADER_LEN {
        let header = String::from_utf8_lossy(&data[..HEADER_LEN]).escape_debug().to_string();
        return CropassError::UnsupportedFormat(format!("unrecognized header \"{header}\""));
    }
    if body_len > 0 && body_len % BLOCK_SIZE == 0 && !allow_legacy {
        return CropassError::UnsupportedFormat(
            "header-less legacy container (set allow_legacy_format = true to read it)".into(),
        );
    }
    CropassError::InvalidCiphertextLength(body_len)
}

// ---------------------------------------------------------------------------
// Disk I/O
// ---------------------------------------------------------------------------

/// Read a container file.  Returns `None` when no file exists.
pub fn read_container(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write `data` to a temp file next to `path` and flush it to disk.
///
/// Returns the temp path; the caller renames it over `path` once any
/// previous container has been backed up.  The temp file is in the
/// same directory so the rename stays on one filesystem.
pub fn stage_container(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let write = || -> std::io::Result<()> {
        let mut file = options.open(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()
    };
    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(tmp_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(blocks: usize) -> Vec<u8> {
        vec![0xA5; blocks * BLOCK_SIZE]
    }

    #[test]
    fn frame_lays_out_header_ciphertext_iv() {
        let iv = [9u8; IV_LEN];
        let framed = frame(&body(2), &iv);
        assert_eq!(framed.len(), HEADER_LEN + 32 + IV_LEN);
        assert_eq!(&framed[..HEADER_LEN], MAGIC);
        assert_eq!(&framed[framed.len() - IV_LEN..], &iv);
    }

    #[test]
    fn unframe_current_layout() {
        let iv = [3u8; IV_LEN];
        let framed = frame(&body(3), &iv);
        let parts = unframe(&framed, false).unwrap();
        assert_eq!(parts.version, FormatVersion::Current);
        assert_eq!(parts.ciphertext, &body(3)[..]);
        assert_eq!(parts.iv, iv);
    }

    #[test]
    fn unframe_legacy_layout_when_allowed() {
        let mut data = body(2);
        data.extend_from_slice(&[4u8; IV_LEN]);

        let parts = unframe(&data, true).unwrap();
        assert_eq!(parts.version, FormatVersion::Legacy);
        assert_eq!(parts.ciphertext.len(), 32);
        assert_eq!(parts.iv, [4u8; IV_LEN]);

        assert!(matches!(
            unframe(&data, false),
            Err(CropassError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn unframe_rejects_foreign_header() {
        let mut data = b"XYZ00001".to_vec();
        data.extend_from_slice(&body(1));
        data.extend_from_slice(&[0u8; IV_LEN]);
        assert!(matches!(
            unframe(&data, true),
            Err(CropassError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn unframe_rejects_misaligned_or_short_input() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 20]);
        data.extend_from_slice(&[0u8; IV_LEN]);
        assert!(matches!(
            unframe(&data, true),
            Err(CropassError::InvalidCiphertextLength(20))
        ));

        assert!(matches!(
            unframe(&[0u8; 5], true),
            Err(CropassError::InvalidCiphertextLength(_))
        ));

        // Header and IV with no ciphertext block in between.
        let mut empty = MAGIC.to_vec();
        empty.extend_from_slice(&[0u8; IV_LEN]);
        assert!(matches!(
            unframe(&empty, true),
            Err(CropassError::InvalidCiphertextLength(0))
        ));
    }

    #[test]
    fn read_missing_container_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_container(&dir.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn stage_writes_sibling_temp_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("cropass-secret");
        let tmp = stage_container(&target, b"payload").unwrap();
        assert_eq!(tmp.parent(), Some(dir.path()));
        assert_eq!(fs::read(&tmp).unwrap(), b"payload");
        assert!(!target.exists());
    }
}
