//! `encrypted-storage list` — show the keys stored under the resource.

use crate::cli::output;
use crate::cli::{open_session, warn_if_ephemeral, Cli};
use crate::errors::Result;

/// Execute the `list` command. Values are never retrieved.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = open_session(cli, false)?;
    warn_if_ephemeral(&session.settings);

    let keys = session.store.keys()?;

    output::info(&format!(
        "{} — {} secret(s)",
        session.store.resource(),
        keys.len()
    ));
    output::print_keys_table(session.store.resource(), &keys);

    Ok(())
}
