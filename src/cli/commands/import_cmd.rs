//! `cropass import`: load records from a plain-text file.
//!
//! The file uses the same line format as the container contents:
//! `site user password created` with `created` in Unix seconds.  Every
//! line must decode; nothing is written if any line is bad.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::cli::output;
use crate::cli::{open_store, Cli, TerminalSecrets};
use crate::errors::{CropassError, Result};
use crate::vault::{ParseMode, Plaintext, Record};

use super::report_backup;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &Path, reset: bool) -> Result<()> {
    let records = read_import_file(file)?;

    if records.is_empty() && !reset {
        output::warning("No records found in the import file.");
        return Ok(());
    }

    let (store, _settings) = open_store(cli)?;
    let imported = records.len();
    let outcome = store.import_records(&mut TerminalSecrets, records, reset)?;

    let verb = if reset { "Replaced store with" } else { "Imported" };
    output::success(&format!(
        "{verb} {imported} record(s) from {} ({} total)",
        file.display(),
        outcome.record_count
    ));
    report_backup(&outcome);

    Ok(())
}

/// Strictly decode every line of `path`.
fn read_import_file(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CropassError::NotFound(path.to_path_buf()),
        _ => e.into(),
    })?;
    Plaintext::from_bytes(bytes).records(ParseMode::Strict)
}
