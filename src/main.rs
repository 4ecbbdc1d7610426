use clap::Parser;
use encrypted_storage::cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Set { ref key, ref value } => commands::set::execute(&cli, key, value.as_deref()),
        Commands::Get { ref key } => commands::get::execute(&cli, key),
        Commands::Remove { ref key } => commands::remove::execute(&cli, key),
        Commands::Clear { force } => commands::clear::execute(&cli, force),
        Commands::List => commands::list::execute(&cli),
        Commands::Serve => commands::serve::execute(&cli),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        let msg = match e.cause() {
            Some(cause) => format!("{e}: {cause}"),
            None => e.to_string(),
        };
        encrypted_storage::cli::output::error(&msg);
        std::process::exit(1);
    }
}
