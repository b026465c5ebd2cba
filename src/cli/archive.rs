use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ledger_import::importer::BankingImporter;
use tracing::{debug, warn};

use super::{collect_files, find_importer};

/// `<destination>/<account as directories>/<date>.<name>`
fn archive_path(importer: &BankingImporter, destination: &Path, file: &Path) -> anyhow::Result<PathBuf> {
    let mut path = destination.to_path_buf();
    for component in importer.account(file).split(':') {
        path.push(component);
    }
    path.push(format!("{}.{}", importer.date(file)?, importer.filename(file)));
    Ok(path)
}

fn move_file(from: &Path, to: &Path) -> anyhow::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(from, to).is_err() {
        // rename fails across filesystems
        debug!(from = %from.display(), "rename failed, copying instead");
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}

pub fn run(
    importers: &[BankingImporter],
    paths: &[PathBuf],
    destination: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut moves = Vec::new();
    for file in collect_files(paths)? {
        match find_importer(importers, &file)? {
            Some(importer) => moves.push((archive_path(importer, destination, &file)?, file)),
            None => warn!(file = %file.display(), "no importer matched, leaving in place"),
        }
    }

    for (to, _) in &moves {
        if to.exists() {
            bail!("destination already exists: {}", to.display());
        }
    }

    for (to, from) in &moves {
        println!("{} -> {}", from.display(), to.display());
        if !dry_run {
            move_file(from, to).with_context(|| format!("moving {}", from.display()))?;
        }
    }
    Ok(())
}
