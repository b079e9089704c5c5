//! `cropass show`: print stored records.

use crate::cli::output;
use crate::cli::{open_store, Cli, TerminalSecrets};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, site: Option<&str>) -> Result<()> {
    let (store, settings) = open_store(cli)?;
    let records = store.records(&mut TerminalSecrets, settings.read_mode())?;

    let mut shown = 0;
    for record in records
        .iter()
        .filter(|r| site.map_or(true, |s| r.site.contains(s)))
    {
        print!("{}", record.encode());
        shown += 1;
    }

    if shown == 0 {
        match site {
            Some(s) => output::warning(&format!("No records match '{s}'.")),
            None => output::warning("No records yet. Run `cropass new <SITE> <USER>`."),
        }
    }

    Ok(())
}
