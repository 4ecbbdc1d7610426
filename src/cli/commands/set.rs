//! `encrypted-storage set` — store a secret, replacing any existing value.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_session, validate_key, warn_if_ephemeral, Cli};
use crate::errors::{Result, StorageError};

/// Execute the `set` command.
pub fn execute(cli: &Cli, key: &str, value: Option<&str>) -> Result<()> {
    validate_key(key)?;

    // Determine the secret value from one of three sources.
    let secret_value = if let Some(v) = value {
        // Source 1: Inline value on the command line.
        output::warning("Value provided on command line — it may appear in shell history.");
        Zeroizing::new(v.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        // Source 3: Interactive secure prompt (default).
        let v = dialoguer::Password::new()
            .with_prompt(format!("Enter value for {key}"))
            .allow_empty_password(true)
            .interact()
            .map_err(|e| StorageError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(v)
    };

    let session = open_session(cli, true)?;
    warn_if_ephemeral(&session.settings);

    let result = session.store.set_item(key, &secret_value);
    session.auditor.record("setItem", Some(key), &result);
    result?;

    output::success(&format!(
        "Stored '{key}' in {}",
        session.store.resource()
    ));

    Ok(())
}
