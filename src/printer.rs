//! Beancount text rendering for extracted directives.

use std::path::Path;

use crate::models::{Amount, Balance, Directive, Transaction};

const ACCOUNT_WIDTH: usize = 40;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn amount_column(account: &str, amount: &Amount) -> String {
    format!(
        "{account:<width$} {:>12} {}",
        amount.number.to_string(),
        amount.currency,
        width = ACCOUNT_WIDTH
    )
}

pub fn format_transaction(txn: &Transaction) -> String {
    let mut out = format!("{} {}", txn.date, txn.flag.symbol());
    match (&txn.payee, &txn.narration) {
        (Some(payee), narration) => out.push_str(&format!(
            " {} {}",
            quote(payee),
            quote(narration.as_deref().unwrap_or_default())
        )),
        (None, Some(narration)) => out.push_str(&format!(" {}", quote(narration))),
        (None, None) => {}
    }
    for posting in &txn.postings {
        out.push_str(&format!("\n  {}", amount_column(&posting.account, &posting.units)));
    }
    out
}

pub fn format_balance(balance: &Balance) -> String {
    format!(
        "{} balance {}",
        balance.date,
        amount_column(&balance.account, &balance.amount)
    )
}

pub fn format_directive(directive: &Directive) -> String {
    match directive {
        Directive::Transaction(txn) => format_transaction(txn),
        Directive::Balance(balance) => format_balance(balance),
    }
}

/// One file's directives under a header naming the source file.
pub fn format_file(filepath: &Path, directives: &[Directive]) -> String {
    let mut out = format!(";; -*- {} -*-\n", filepath.display());
    for directive in directives {
        out.push('\n');
        out.push_str(&format_directive(directive));
        out.push('\n');
    }
    out
}
