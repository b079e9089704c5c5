//! `cropass new`: create an entry with a generated password.

use crate::cli::output;
use crate::cli::{open_store, Cli, TerminalSecrets};
use crate::errors::Result;

use super::report_backup;

/// Execute the `new` command.
pub fn execute(cli: &Cli, site: &str, user: &str, length: Option<u16>) -> Result<()> {
    let (store, settings) = open_store(cli)?;
    let length = length.map_or(settings.password_length, usize::from);

    let (record, outcome) = store.new_record(&mut TerminalSecrets, site, user, length)?;

    print!("{}", record.encode());
    output::success(&format!(
        "Password for '{}' generated ({} total)",
        record.site, outcome.record_count
    ));
    report_backup(&outcome);

    Ok(())
}
