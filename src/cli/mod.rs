pub mod archive;
pub mod extract;
pub mod identify;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use ledger_import::importer::BankingImporter;
use ledger_import::settings::load_settings;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "ledger-import",
    about = "Turn bank statement exports into beancount entries."
)]
pub struct Cli {
    /// Log every identification and extraction step to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Importer configuration (default: ~/.config/ledger-import/importers.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which importer claims each file.
    Identify {
        /// Statement files or directories holding them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print beancount entries for every identified file.
    Extract {
        /// Statement files or directories holding them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Move identified files into a per-account document tree.
    Archive {
        /// Statement files or directories holding them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Root of the document tree
        #[arg(short, long)]
        destination: PathBuf,
        /// Only print what would be moved
        #[arg(long)]
        dry_run: bool,
    },
}

/// Expand directories one level deep, keeping plain files as given.
pub(crate) fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("reading directory {}", path.display()))?
            {
                let entry_path = entry?.path();
                if entry_path.is_file() {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

pub(crate) fn load_importers(config: Option<&Path>) -> anyhow::Result<Vec<BankingImporter>> {
    let settings = load_settings(config).context("loading importer configuration")?;
    let importers = settings
        .build_importers()
        .context("building importers")?;
    debug!(count = importers.len(), "importers configured");
    Ok(importers)
}

/// The first importer that claims `path`.
pub(crate) fn find_importer<'a>(
    importers: &'a [BankingImporter],
    path: &Path,
) -> anyhow::Result<Option<&'a BankingImporter>> {
    for importer in importers {
        if importer
            .identify(path)
            .with_context(|| format!("identifying {}", path.display()))?
        {
            return Ok(Some(importer));
        }
    }
    Ok(None)
}
