use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};
use ledger_import::importer::BankingImporter;

use super::{collect_files, find_importer};

pub fn run(importers: &[BankingImporter], paths: &[PathBuf]) -> anyhow::Result<()> {
    let files = collect_files(paths)?;
    let mut table = Table::new();
    table.set_header(vec!["File", "Account", "Date", "Name"]);

    let mut identified = 0;
    for file in &files {
        match find_importer(importers, file)? {
            Some(importer) => {
                identified += 1;
                table.add_row(vec![
                    Cell::new(file.display()),
                    Cell::new(importer.account(file)),
                    Cell::new(importer.date(file)?),
                    Cell::new(importer.filename(file)),
                ]);
            }
            None => {
                table.add_row(vec![
                    Cell::new(file.display()),
                    Cell::new("-".dimmed()),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
        }
    }

    println!("{table}");
    let summary = format!("{identified} of {} files identified", files.len());
    if identified == files.len() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }
    Ok(())
}
