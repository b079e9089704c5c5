//! High-level store operations used by CLI commands.
//!
//! `Store` wraps the container format layer and the crypto layer so the
//! rest of the application works with whole record sets.  Every command
//! performs at most one read-modify-write cycle:
//!
//! 1. read the container (a missing file is an empty record set),
//! 2. decrypt and decode the records,
//! 3. append or replace records,
//! 4. encrypt under a fresh IV and stage the new container in a temp file,
//! 5. link the old container to a timestamped backup name,
//! 6. rename the staged file over the container.
//!
//! The container path exists throughout: a crash at any step leaves
//! either the old or the new container in place.
//!
//! Invocations are not coordinated with each other: two concurrent
//! writers against one directory can race and lose an update.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::crypto::{derive, generate_iv, generate_password, Cipher};
use crate::errors::Result;

use super::format;
use super::plaintext::{ParseMode, Plaintext};
use super::record::Record;
use super::source::SecretSource;

/// File name of the container inside the storage directory.
pub const CONTAINER_FILE_NAME: &str = "cropass-secret";

/// Explicit store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the container and its backups.
    pub storage_dir: PathBuf,

    /// Accept header-less containers on read.
    pub allow_legacy_format: bool,
}

impl StoreConfig {
    /// Configuration with defaults for everything but the directory.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            allow_legacy_format: true,
        }
    }
}

/// Result of a mutating operation.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    /// Number of records in the new container.
    pub record_count: usize,

    /// Where the previous container was moved, if there was one.
    pub backup: Option<PathBuf>,
}

/// Handle on one storage directory.
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Path to the container file.
    pub fn container_path(&self) -> PathBuf {
        self.config.storage_dir.join(CONTAINER_FILE_NAME)
    }

    /// Path a backup taken at `unix_seconds` is given.
    pub fn backup_path(&self, unix_seconds: i64) -> PathBuf {
        self.config
            .storage_dir
            .join(format!("{CONTAINER_FILE_NAME}-{unix_seconds}"))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Core cycle
    // ------------------------------------------------------------------

    /// Decrypt the container with `master_secret`.
    ///
    /// A missing container yields an empty plaintext.  A wrong password is
    /// not detected here; it produces garbage that fails record decoding.
    pub fn read(&self, master_secret: &[u8]) -> Result<Plaintext> {
        let path = self.container_path();
        let Some(data) = format::read_container(&path)? else {
            debug!(path = %path.display(), "no container yet");
            return Ok(Plaintext::empty());
        };

        let parts = format::unframe(&data, self.config.allow_legacy_format)?;
        let key = derive(master_secret);
        let cipher = Cipher::new(key.as_bytes(), &parts.iv)?;
        let plain = cipher.decrypt(parts.ciphertext)?;

        Ok(Plaintext::from_bytes(plain))
    }

    /// Encrypt `plaintext` and replace the container.
    ///
    /// The new container is fully written and synced before the old one
    /// is touched, and the final rename replaces it in one step.  Returns
    /// the backup path of the previous container.
    pub fn write(&self, master_secret: &[u8], plaintext: &Plaintext) -> Result<Option<PathBuf>> {
        let key = derive(master_secret);
        let iv = generate_iv();
        let ciphertext = Cipher::new(key.as_bytes(), &iv)?.encrypt(plaintext.as_bytes());
        let framed = format::frame(&ciphertext, &iv);

        let path = self.container_path();
        let staged = format::stage_container(&path, &framed)?;

        let backup = match self.backup_existing(&path) {
            Ok(backup) => backup,
            Err(e) => {
                let _ = fs::remove_file(&staged);
                return Err(e);
            }
        };

        fs::rename(&staged, &path)?;
        debug!(path = %path.display(), bytes = framed.len(), "container written");

        Ok(backup)
    }

    /// Preserve an existing container under its backup name.
    ///
    /// The container itself stays in place.  Filesystems without hard
    /// links get a copy instead.
    fn backup_existing(&self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.exists() {
            return Ok(None);
        }

        let backup = self.free_backup_path(Utc::now().timestamp());
        if let Err(e) = fs::hard_link(path, &backup) {
            debug!(error = %e, "hard link failed, copying backup");
            fs::copy(path, &backup)?;
        }
        info!(backup = %backup.display(), "previous container backed up");

        Ok(Some(backup))
    }

    /// First unused backup name for `unix_seconds`.
    ///
    /// Two writes within one second get `-1`, `-2`, ... suffixes so an
    /// older backup is never overwritten.
    fn free_backup_path(&self, unix_seconds: i64) -> PathBuf {
        let base = self.backup_path(unix_seconds);
        let mut candidate = base.clone();
        let mut n = 1u32;
        while candidate.exists() {
            let mut name = OsString::from(base.as_os_str());
            name.push(format!("-{n}"));
            candidate = PathBuf::from(name);
            n += 1;
        }
        candidate
    }

    // ------------------------------------------------------------------
    // Compositions
    // ------------------------------------------------------------------

    /// Read and decode all records.
    pub fn records(&self, source: &mut dyn SecretSource, mode: ParseMode) -> Result<Vec<Record>> {
        let master = source.read_secret()?;
        self.read(&master)?.records(mode)
    }

    /// Append `record`.
    ///
    /// Existing records are decoded strictly first, so a wrong master
    /// password aborts instead of re-encrypting garbage.
    pub fn add(&self, source: &mut dyn SecretSource, record: Record) -> Result<WriteOutcome> {
        self.append(source, vec![record])
    }

    /// Append a record with a freshly generated `password_len`-character
    /// password.  Returns the new record.
    pub fn new_record(
        &self,
        source: &mut dyn SecretSource,
        site: &str,
        name: &str,
        password_len: usize,
    ) -> Result<(Record, WriteOutcome)> {
        let record = Record::new(site, name, &generate_password(password_len), now())?;
        let outcome = self.add(source, record.clone())?;
        Ok((record, outcome))
    }

    /// Add `imported` records, or replace all records when `reset` is set.
    ///
    /// A reset still decodes the existing records strictly first, so it
    /// cannot re-key a store under a mistyped master password.  The
    /// replaced records survive in the backup.
    pub fn import_records(
        &self,
        source: &mut dyn SecretSource,
        imported: Vec<Record>,
        reset: bool,
    ) -> Result<WriteOutcome> {
        if !reset {
            return self.append(source, imported);
        }

        let master = source.read_secret_confirmed()?;
        let replaced = self.read(&master)?.records(ParseMode::Strict)?;
        debug!(replaced = replaced.len(), "resetting store");

        let backup = self.write(&master, &Plaintext::from_records(&imported))?;
        Ok(WriteOutcome {
            record_count: imported.len(),
            backup,
        })
    }

    fn append(&self, source: &mut dyn SecretSource, new: Vec<Record>) -> Result<WriteOutcome> {
        let master = source.read_secret_confirmed()?;
        let mut records = self.read(&master)?.records(ParseMode::Strict)?;
        records.extend(new);

        let backup = self.write(&master, &Plaintext::from_records(&records))?;
        Ok(WriteOutcome {
            record_count: records.len(),
            backup,
        })
    }
}

/// Current time in Unix seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}
