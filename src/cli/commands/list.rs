//! `cropass list`: display sites and users in a table.

use crate::cli::output;
use crate::cli::{open_store, Cli, TerminalSecrets};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (store, settings) = open_store(cli)?;
    let mut records = store.records(&mut TerminalSecrets, settings.read_mode())?;
    records.sort_by(|a, b| a.site.cmp(&b.site).then_with(|| a.name.cmp(&b.name)));

    output::info(&format!("{} record(s)", records.len()));
    output::print_records_table(&records);

    Ok(())
}
