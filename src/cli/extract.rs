use std::path::PathBuf;

use anyhow::Context;
use ledger_import::importer::BankingImporter;
use ledger_import::printer::format_file;
use tracing::warn;

use super::{collect_files, find_importer};

pub fn run(
    importers: &[BankingImporter],
    paths: &[PathBuf],
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let mut out = String::from(";; -*- mode: beancount -*-\n");
    for file in collect_files(paths)? {
        let Some(importer) = find_importer(importers, &file)? else {
            warn!(file = %file.display(), "no importer matched");
            continue;
        };
        let entries = importer
            .extract(&file, &[])
            .with_context(|| format!("extracting {}", file.display()))?;
        out.push('\n');
        out.push_str(&format_file(&file, &entries));
    }

    match output {
        Some(path) => std::fs::write(path, out)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{out}"),
    }
    Ok(())
}
