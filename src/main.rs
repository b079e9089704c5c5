use clap::Parser;
use tracing_subscriber::EnvFilter;

use cropass::cli::{Cli, Commands};

fn main() {
    // Diagnostics go to stderr so stdout carries only record output.
    // RUST_LOG=cropass=debug shows container layout and backup details.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cropass=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show { ref site } => cropass::cli::commands::show::execute(&cli, site.as_deref()),
        Commands::List => cropass::cli::commands::list::execute(&cli),
        Commands::New {
            ref site,
            ref user,
            length,
        } => cropass::cli::commands::new::execute(&cli, site, user, length),
        Commands::Add { ref site, ref user } => {
            cropass::cli::commands::add::execute(&cli, site, user)
        }
        Commands::Import { ref file, reset } => {
            cropass::cli::commands::import_cmd::execute(&cli, file, reset)
        }
        Commands::Completions { shell } => cropass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        cropass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
