//! CLI interface for reading a journal store.
//!
//! Each subcommand is non-interactive: arguments in, plain text or JSON out.
//! The store is taken from `--journal`, falling back to the `journal` key in
//! the config file.

mod format;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;

use dayone::config::Config;
use dayone::{Journal, Visit, generate_identity};

use format::{format_bytes, format_entry_line};

/// Read entries and photos from a Day One journal.
#[derive(Debug, Parser)]
#[command(name = "dayone")]
pub struct Cli {
    /// Journal store directory (contains `entries/` and `photos/`).
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every entry: identity, creation date, and first line of text.
    ///
    /// Entries that cannot be read are reported on stderr and skipped.
    List,

    /// Print one entry as JSON.
    Show {
        /// Entry identity (32 uppercase hex characters).
        identity: String,
    },

    /// Report or extract an entry's photo.
    Photo {
        /// Entry identity (32 uppercase hex characters).
        identity: String,

        /// Copy the photo to this file instead of reporting its size.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print a freshly generated entry identity.
    NewId,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => cmd_list(&open_journal(config, cli.journal)?),
        Command::Show { identity } => cmd_show(&open_journal(config, cli.journal)?, &identity),
        Command::Photo { identity, out } => {
            cmd_photo(&open_journal(config, cli.journal)?, &identity, out.as_deref())
        }
        Command::NewId => {
            println!("{}", generate_identity());
            Ok(())
        }
    }
}

/// Resolve the store from `--journal` or the config file.
fn open_journal(config: &Config, explicit: Option<PathBuf>) -> Result<Journal, String> {
    let root = explicit
        .or_else(|| config.journal.clone())
        .ok_or("no journal given: pass --journal <dir> or set `journal` in the config file")?;
    Ok(Journal::new(root).with_unknown_fields(config.unknown_fields))
}

fn cmd_list(journal: &Journal) -> Result<(), String> {
    let mut listed = 0_usize;
    let mut skipped = 0_usize;

    journal
        .for_each(|entry| {
            match entry {
                Ok(entry) => {
                    println!("{}", format_entry_line(&entry));
                    listed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    skipped += 1;
                }
            }
            Visit::Continue
        })
        .map_err(|e| format!("failed to read journal: {e}"))?;

    if listed == 0 && skipped == 0 {
        println!("No entries");
    } else if skipped > 0 {
        eprintln!("Skipped {skipped} unreadable entries");
    }
    Ok(())
}

fn cmd_show(journal: &Journal, identity: &str) -> Result<(), String> {
    let entry = journal
        .read_entry(identity)
        .map_err(|e| format!("failed to read entry: {e}"))?;

    let json = serde_json::to_string_pretty(&entry)
        .map_err(|e| format!("failed to serialize entry: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_photo(journal: &Journal, identity: &str, out: Option<&Path>) -> Result<(), String> {
    let Some(path) = out else {
        let meta = journal
            .photo_stat(identity)
            .map_err(|e| format!("failed to find photo: {e}"))?;
        println!("{identity}.jpg  {}", format_bytes(meta.len()));
        return Ok(());
    };

    let mut photo = journal
        .open_photo(identity)
        .map_err(|e| format!("failed to open photo: {e}"))?;
    let mut file =
        fs::File::create(path).map_err(|e| format!("failed to create {}: {e}", path.display()))?;
    let copied = io::copy(&mut photo, &mut file)
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    eprintln!("Copied {} → {}", format_bytes(copied), path.display());
    Ok(())
}
