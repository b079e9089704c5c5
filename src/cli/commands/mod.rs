//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod import_cmd;
pub mod list;
pub mod new;
pub mod show;

use crate::cli::output;
use crate::vault::WriteOutcome;

/// Tell the user where the previous container went.
pub(crate) fn report_backup(outcome: &WriteOutcome) {
    if let Some(backup) = &outcome.backup {
        output::tip(&format!("Previous container kept as {}", backup.display()));
    }
}
