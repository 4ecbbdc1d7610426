//! `encrypted-storage clear` — remove every secret under the resource.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_session, warn_if_ephemeral, Cli};
use crate::config::ListingPolicy;
use crate::errors::{Result, StorageError};

/// Execute the `clear` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let session = open_session(cli, true)?;
    warn_if_ephemeral(&session.settings);

    let resource = session.store.resource().to_string();

    // Unless --force is set, ask for confirmation before clearing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove every secret stored under {resource}?"))
            .default(false)
            .interact()
            .map_err(|e| StorageError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let result = session.store.clear();
    session.auditor.record("clear", None, &result);
    result?;

    output::success(&format!("Cleared {resource}"));
    if session.store.listing_policy() == ListingPolicy::Lenient {
        output::tip("Listing errors count as an empty store; pass --strict to report them.");
    }

    Ok(())
}
