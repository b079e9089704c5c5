//! `cropass add`: store an entry with a password supplied by the user.

use crate::cli::output;
use crate::cli::{open_store, prompt_site_password, Cli, TerminalSecrets};
use crate::errors::Result;
use crate::vault::store::now;
use crate::vault::Record;

use super::report_backup;

/// Execute the `add` command.
pub fn execute(cli: &Cli, site: &str, user: &str) -> Result<()> {
    let (store, _settings) = open_store(cli)?;

    // Site password first, master password second.
    let password = prompt_site_password()?;
    let record = Record::new(site, user, &password, now())?;

    let outcome = store.add(&mut TerminalSecrets, record.clone())?;

    print!("{}", record.encode());
    output::success(&format!(
        "Password for '{}' added ({} total)",
        record.site, outcome.record_count
    ));
    report_backup(&outcome);

    Ok(())
}
