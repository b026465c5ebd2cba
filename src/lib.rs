//! Convert bank statement exports into beancount directives.
//!
//! A [`BankingImporter`](importer::BankingImporter) recognises one account's
//! statement files and turns their rows into transactions plus closing
//! balance assertions. Ready-made importers live in [`banks`].

pub mod banks;
pub mod descriptors;
pub mod error;
pub mod importer;
pub mod models;
pub mod printer;
pub mod reader;
pub mod settings;
pub mod text;
