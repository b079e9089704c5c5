//! CLI module: Clap argument parser, prompting, output helpers, and
//! command implementations.

pub mod commands;
pub mod output;

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CropassError, Result};
use crate::vault::source::confirm;
use crate::vault::{SecretSource, Store};

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "CROPASS_PASSWORD";

/// Directory used when neither `--dir` nor `CROPASS_PASS_DIR` is set.
pub const DEFAULT_DIR_NAME: &str = "cropass-encrypted-passwords";

/// cropass CLI: local encrypted password store.
#[derive(Parser)]
#[command(name = "cropass", about = "Local encrypted password store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage directory (default: ~/cropass-encrypted-passwords)
    #[arg(long, env = "CROPASS_PASS_DIR", global = true)]
    pub dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print stored records (site user password created)
    Show {
        /// Only records whose site contains this text
        site: Option<String>,
    },

    /// List sites and users without passwords
    List,

    /// Generate a random password for a new entry
    New {
        /// Site name (e.g. github.com)
        site: String,
        /// User name on that site
        user: String,
        /// Password length (default: password_length from cropass.toml)
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        length: Option<u16>,
    },

    /// Add an entry with a password you choose
    Add {
        /// Site name (e.g. github.com)
        site: String,
        /// User name on that site
        user: String,
    },

    /// Import records from a plain-text file (one `site user password created` per line)
    Import {
        /// Path to the file to import
        file: PathBuf,
        /// Replace all existing records instead of appending
        #[arg(long)]
        reset: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Master password source
// ---------------------------------------------------------------------------

/// Master password source for the terminal, trying in order:
/// 1. `CROPASS_PASSWORD` env var (scripts; counts as both entries)
/// 2. Interactive hidden prompt
pub struct TerminalSecrets;

impl SecretSource for TerminalSecrets {
    fn read_secret(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(pw) = env_password() {
            return Ok(pw);
        }
        prompt_hidden("master password")
    }

    fn read_secret_confirmed(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(pw) = env_password() {
            return Ok(pw);
        }
        let first = prompt_hidden("master password")?;
        let second = prompt_hidden("master password again")?;
        confirm(first, &second)
    }
}

fn env_password() -> Option<Zeroizing<Vec<u8>>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(|pw| Zeroizing::new(pw.into_bytes()))
}

fn prompt_hidden(prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CropassError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw.into_bytes()))
}

/// Read the password for a site entry.
///
/// Piped stdin supplies its first line; a terminal gets two hidden
/// prompts that must match.
pub fn prompt_site_password() -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut line = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut line)?;
        let trimmed = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let first = prompt_hidden("password")?;
    let second = prompt_hidden("password again")?;
    let confirmed = confirm(first, &second)?;
    let pw = String::from_utf8(confirmed.to_vec())
        .map_err(|_| CropassError::CommandFailed("password is not valid UTF-8".into()))?;
    Ok(Zeroizing::new(pw))
}

// ---------------------------------------------------------------------------
// Storage directory
// ---------------------------------------------------------------------------

/// Resolve the storage directory from `--dir` / `CROPASS_PASS_DIR`,
/// falling back to `~/cropass-encrypted-passwords`.  Creates it if
/// missing.
pub fn storage_dir(cli: &Cli) -> Result<PathBuf> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => dirs::home_dir()
            .ok_or_else(|| {
                CropassError::ConfigError(
                    "cannot determine home directory; set CROPASS_PASS_DIR".into(),
                )
            })?
            .join(DEFAULT_DIR_NAME),
    };

    if !dir.exists() {
        create_private_dir(&dir)?;
        output::info(&format!("Created storage directory: {}", dir.display()));
    }

    Ok(dir)
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)?;
    Ok(())
}

/// Resolve the storage directory, load its settings and open the store.
pub fn open_store(cli: &Cli) -> Result<(Store, Settings)> {
    let dir = storage_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let store = Store::new(settings.store_config(&dir));
    Ok((store, settings))
}
