//! Ready-made importers for the banks we download statements from.

use crate::descriptors::{
    FileDescriptionCsv, FileSpec, FromAmount, FromDate, FromNarration, FromPayeeNarration,
    FromSignAmount, FromTransactionType,
};
use crate::error::Result;
use crate::importer::BankingImporter;
use crate::models::{Currency, TransactionType};

const REVOLUT_HEADER: &[&str] = &[
    "Type",
    "Product",
    "Started Date",
    "Completed Date",
    "Description",
    "Amount",
    "Fee",
    "Currency",
    "State",
    "Balance",
];

/// Revolut exports one CSV per currency pocket; `currency` selects which.
/// Pending rows have no completion date and are left out.
pub fn revolut(root_account: &str, fee_account: &str, currency: Currency) -> Result<BankingImporter> {
    let file = FileDescriptionCsv::new(
        FileSpec::new(
            ".csv",
            r"^account-statement_\d{4}-\d{2}-\d{2}_(?P<date>\d{4}-\d{2}-\d{2})_(en(-gb)?)_.*\.csv$",
            REVOLUT_HEADER,
        )?
        .entry_mapping(&[("Currency", currency.code())]),
    );

    Ok(BankingImporter::new(
        root_account,
        file,
        FromDate::new("Completed Date", "%Y-%m-%d %H:%M:%S").empty_date(""),
        FromNarration::new("Description").max_length(40),
        FromTransactionType::new(
            "Type",
            [
                (TransactionType::Exchange, vec!["EXCHANGE"]),
                (TransactionType::Transfer, vec!["TOPUP", "CARD_PAYMENT", "TRANSFER"]),
            ],
        ),
        FromAmount::new("Amount", "Currency"),
    )
    .with_fee(fee_account, FromAmount::new("Fee", "Currency"))
    .with_balance(FromAmount::new("Balance", "Currency")))
}

const ING_CURRENT_HEADER: &[&str] = &[
    "Date",
    "Name / Description",
    "Account",
    "Counterparty",
    "Code",
    "Debit/credit",
    "Amount (EUR)",
    "Transaction type",
    "Notifications",
    "Resulting balance",
    "Tag",
];

/// ING current account, English CSV export. Files are named
/// `<IBAN>_<from>_<to>.csv` and dated by the end of the period.
pub fn ing_current(root_account: &str, account_id: &str) -> Result<BankingImporter> {
    let pattern = format!(
        r"^{}_\d{{2}}-\d{{2}}-\d{{4}}_(?P<date>\d{{2}}-\d{{2}}-\d{{4}})\.csv$",
        regex::escape(account_id)
    );
    let file = FileDescriptionCsv::new(
        FileSpec::new(".csv", &pattern, ING_CURRENT_HEADER)?.date_format("%d-%m-%Y"),
    )
    .delimiter(b';');

    Ok(BankingImporter::new(
        root_account,
        file,
        FromDate::new("Date", "%Y%m%d"),
        FromNarration::new("Name / Description").max_length(40),
        FromTransactionType::new(
            "Code",
            [(TransactionType::Transfer, vec!["OV", "GT", "VZ", "ID", "IC", "BA"])],
        ),
        FromSignAmount::with_currency("Debit/credit", "Amount (EUR)", Currency::Eur),
    )
    .with_balance(FromAmount::with_currency("Resulting balance", Currency::Eur)))
}

const ING_SAVINGS_HEADER: &[&str] = &[
    "Datum",
    "Omschrijving",
    "Rekening",
    "Rekening naam",
    "Tegenrekening",
    "Af Bij",
    "Bedrag",
    "Valuta",
    "Mutatiesoort",
    "Mededelingen",
    "Saldo na mutatie",
];

/// ING savings account, Dutch CSV export. Dated by the start of the period.
pub fn ing_savings(root_account: &str, account_id: &str) -> Result<BankingImporter> {
    let pattern = format!(
        r"^{}_(?P<date>\d{{2}}-\d{{2}}-\d{{4}})_\d{{2}}-\d{{2}}-\d{{4}}\.csv$",
        regex::escape(account_id)
    );
    let file = FileDescriptionCsv::new(
        FileSpec::new(".csv", &pattern, ING_SAVINGS_HEADER)?.date_format("%d-%m-%Y"),
    )
    .delimiter(b';');

    Ok(BankingImporter::new(
        root_account,
        file,
        FromDate::new("Datum", "%Y-%m-%d"),
        FromPayeeNarration::new("Tegenrekening", "Mededelingen").max_lengths(20, 40),
        FromTransactionType::new("Mutatiesoort", [(TransactionType::Transfer, vec!["Inleg"])]),
        FromSignAmount::with_currency("Af Bij", "Bedrag", Currency::Eur),
    )
    .with_balance(FromAmount::with_currency("Saldo na mutatie", Currency::Eur)))
}

#[cfg(feature = "xlsx")]
pub use xlsx::argenta;

#[cfg(feature = "xlsx")]
mod xlsx {
    use super::*;
    use crate::descriptors::{FileDescriptionXlsx, FromPostingTransactionDate};

    const ARGENTA_HEADER: &[&str] = &[
        "Rekening",
        "Boekdatum",
        "Valutadatum",
        "Referentie",
        "Beschrijving",
        "Bedrag",
        "Munt",
        "Verrichtingsdatum",
        "Rekening tegenpartij",
        "Naam tegenpartij",
        "Mededeling",
    ];

    const DATE_FORMAT: &str = "%d-%m-%Y";

    /// Argenta XLSX export. The statement carries no running balance.
    pub fn argenta(root_account: &str, account_id: &str) -> Result<BankingImporter> {
        let pattern = format!(
            r"^Argenta_({})_(?P<date>\d{{4}}-\d{{2}}-\d{{2}})_\d{{6}}\.xlsx$",
            regex::escape(account_id)
        );
        let file = FileDescriptionXlsx::new(FileSpec::new(".xlsx", &pattern, ARGENTA_HEADER)?)
            .cell_date_format(DATE_FORMAT);

        Ok(BankingImporter::new(
            root_account,
            file,
            FromPostingTransactionDate::new("Boekdatum", "Valutadatum", DATE_FORMAT),
            FromPayeeNarration::new("Naam tegenpartij", "Mededeling").max_lengths(20, 40),
            FromTransactionType::new(
                "Beschrijving",
                [(
                    TransactionType::Transfer,
                    vec![
                        "Diverse verrichting",
                        "Inkomende overschrijving",
                        "Betaling bancontact",
                    ],
                )],
            ),
            FromAmount::new("Bedrag", "Munt"),
        ))
    }
}
