use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use crate::descriptors::{
    AmountDescriptor, DateDescriptor, FileDescription, PayeeNarrationDescriptor,
    TransactionTypeDescriptor,
};
use crate::error::Result;
use crate::models::{
    Balance, Currency, Directive, Flag, Metadata, Posting, Transaction, TransactionType,
};

/// Turns one bank account's statement files into ledger directives.
///
/// Every slot holds an immutable descriptor; nothing is kept between calls to
/// [`extract`](Self::extract).
pub struct BankingImporter {
    pub root_account: String,
    pub file_description: Box<dyn FileDescription>,
    pub date: Box<dyn DateDescriptor>,
    pub payee_narration: Box<dyn PayeeNarrationDescriptor>,
    pub transaction_type: Box<dyn TransactionTypeDescriptor>,
    pub root_amount: Box<dyn AmountDescriptor>,
    pub fee: Option<(String, Box<dyn AmountDescriptor>)>,
    pub balance: Option<Box<dyn AmountDescriptor>>,
}

impl BankingImporter {
    pub fn new(
        root_account: &str,
        file_description: impl FileDescription + 'static,
        date: impl DateDescriptor + 'static,
        payee_narration: impl PayeeNarrationDescriptor + 'static,
        transaction_type: impl TransactionTypeDescriptor + 'static,
        root_amount: impl AmountDescriptor + 'static,
    ) -> Self {
        Self {
            root_account: root_account.to_string(),
            file_description: Box::new(file_description),
            date: Box::new(date),
            payee_narration: Box::new(payee_narration),
            transaction_type: Box::new(transaction_type),
            root_amount: Box::new(root_amount),
            fee: None,
            balance: None,
        }
    }

    /// Book non-zero fees from `fee_account`'s point of view.
    pub fn with_fee(mut self, fee_account: &str, fee_amount: impl AmountDescriptor + 'static) -> Self {
        self.fee = Some((fee_account.to_string(), Box::new(fee_amount)));
        self
    }

    /// Emit a closing balance assertion per currency from this column.
    pub fn with_balance(mut self, balance: impl AmountDescriptor + 'static) -> Self {
        self.balance = Some(Box::new(balance));
        self
    }

    pub fn identify(&self, filepath: &Path) -> Result<bool> {
        self.file_description.identify(filepath)
    }

    pub fn date(&self, filepath: &Path) -> Result<NaiveDate> {
        self.file_description.date(filepath)
    }

    pub fn filename(&self, filepath: &Path) -> String {
        self.file_description.name(filepath)
    }

    pub fn account(&self, _filepath: &Path) -> &str {
        &self.root_account
    }

    /// Build one transaction per dated row, followed by one balance assertion
    /// per currency. Any row-level failure aborts the whole file.
    ///
    /// `_existing` holds entries already in the ledger; it is accepted so
    /// callers can pass it through but is not consulted.
    pub fn extract(&self, filepath: &Path, _existing: &[Directive]) -> Result<Vec<Directive>> {
        let filename = filepath.display().to_string();
        let mut entries = Vec::new();
        let mut balances: BTreeMap<Currency, Vec<Balance>> = BTreeMap::new();

        for (lineno, row) in self.file_description.read(filepath)?.iter().enumerate() {
            let meta = Metadata {
                filename: filename.clone(),
                lineno,
            };

            let Some(date) = self.date.extract(row)? else {
                debug!(file = %filename, lineno, "row has no date, skipping");
                continue;
            };
            let (payee, narration) = self.payee_narration.extract(row)?;
            let amount = self.root_amount.extract(row)?;
            let transaction_type = self.transaction_type.extract(row)?;

            let mut postings = vec![Posting {
                account: self.root_account.clone(),
                units: amount,
            }];
            if let Some((fee_account, fee_amount)) = &self.fee {
                let fee = fee_amount.extract(row)?;
                if !fee.is_zero() {
                    postings.push(Posting {
                        account: self.root_account.clone(),
                        units: -fee,
                    });
                    postings.push(Posting {
                        account: fee_account.clone(),
                        units: fee,
                    });
                }
            }

            // Nothing to recognise the entry by in the ledger.
            let flag = if [&payee, &narration]
                .iter()
                .all(|text| text.as_deref().unwrap_or_default().is_empty())
            {
                Flag::Warning
            } else {
                Flag::Okay
            };

            if transaction_type == TransactionType::Skip {
                debug!(file = %filename, lineno, "row classified as skip");
            } else {
                entries.push(Directive::Transaction(Transaction {
                    meta: meta.clone(),
                    date,
                    flag,
                    payee,
                    narration,
                    transaction_type,
                    postings,
                }));
            }

            if let Some(balance) = &self.balance {
                let amount = balance.extract(row)?;
                // A closing balance holds from the start of the next day.
                balances.entry(amount.currency).or_default().push(Balance {
                    meta,
                    date: date + Duration::days(1),
                    account: self.root_account.clone(),
                    amount,
                });
            }
        }

        if entries.is_empty() {
            info!(file = %filename, "no transactions extracted");
            return Ok(Vec::new());
        }
        let transactions = entries.len();

        for (currency, candidates) in balances {
            // max_by_key keeps the last of equal dates, so file order breaks ties.
            if let Some(latest) = candidates.into_iter().max_by_key(|b| b.date) {
                debug!(file = %filename, %currency, date = %latest.date, "balance assertion");
                entries.push(Directive::Balance(latest));
            }
        }

        info!(
            file = %filename,
            transactions,
            balances = entries.len() - transactions,
            "extracted"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{
        FileDescriptionCsv, FileSpec, FromAmount, FromDate, FromNarration, FromTransactionType,
    };
    use crate::error::ImportError;
    use crate::models::Amount;
    use rust_decimal_macros::dec;

    const HEADER: &[&str] = &[
        "Type",
        "Completed Date",
        "Description",
        "Amount",
        "Fee",
        "Currency",
        "Balance",
    ];

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn importer() -> BankingImporter {
        let file = FileDescriptionCsv::new(
            FileSpec::new(".csv", r"^stmt_(?P<date>\d{4}-\d{2}-\d{2})\.csv$", HEADER).unwrap(),
        );
        BankingImporter::new(
            "Assets:Revolut:EUR",
            file,
            FromDate::new("Completed Date", "%Y-%m-%d %H:%M:%S"),
            FromNarration::new("Description").max_length(40),
            FromTransactionType::new(
                "Type",
                [
                    (TransactionType::Exchange, vec!["EXCHANGE"]),
                    (TransactionType::Transfer, vec!["TOPUP", "CARD_PAYMENT", "TRANSFER"]),
                    (TransactionType::Skip, vec!["INTERNAL"]),
                ],
            ),
            FromAmount::new("Amount", "Currency"),
        )
        .with_fee("Expenses:Revolut:Fee", FromAmount::new("Fee", "Currency"))
        .with_balance(FromAmount::new("Balance", "Currency"))
    }

    fn write_statement(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("stmt_2024-09-02.csv");
        let mut content = HEADER.join(",");
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn transactions(entries: &[Directive]) -> Vec<&Transaction> {
        entries.iter().filter_map(Directive::as_transaction).collect()
    }

    fn balances(entries: &[Directive]) -> Vec<&Balance> {
        entries.iter().filter_map(Directive::as_balance).collect()
    }

    #[test]
    fn test_single_topup_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &["TOPUP,2024-08-01 10:00:00,Top-Up by card,12.34,0.00,EUR,100.00"],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        assert_eq!(entries.len(), 2);

        let txns = transactions(&entries);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, ymd(2024, 8, 1));
        assert_eq!(txns[0].narration.as_deref(), Some("topup by card"));
        assert_eq!(txns[0].payee, None);
        assert_eq!(txns[0].postings.len(), 1);
        assert_eq!(txns[0].postings[0].units, Amount::new(dec!(12.34), Currency::Eur));
        assert_eq!(txns[0].meta.lineno, 0);

        let bals = balances(&entries);
        assert_eq!(bals.len(), 1);
        assert_eq!(bals[0].date, ymd(2024, 8, 2));
        assert_eq!(bals[0].account, "Assets:Revolut:EUR");
        assert_eq!(bals[0].amount, Amount::new(dec!(100.00), Currency::Eur));
    }

    #[test]
    fn test_blank_description_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &[
                "TOPUP,2024-08-01 10:00:00,***,1.00,0.00,EUR,1.00",
                "TOPUP,2024-08-02 10:00:00,Top-Up,1.00,0.00,EUR,2.00",
            ],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        let txns = transactions(&entries);
        assert_eq!(txns[0].narration.as_deref(), Some(""));
        assert_eq!(txns[0].flag, Flag::Warning);
        assert_eq!(txns[1].flag, Flag::Okay);
    }

    #[test]
    fn test_pending_rows_are_dropped_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &[
                "CARD_PAYMENT,2024-08-01 10:00:00,Coffee,-3.00,0.00,EUR,97.00",
                "CARD_PAYMENT,,Pending shop,-50.00,0.00,EUR,999.00",
                "TRANSFER,2024-08-02 09:00:00,Rent,-40.00,0.00,EUR,57.00",
            ],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        let txns = transactions(&entries);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].meta.lineno, 2);
        let bals = balances(&entries);
        assert_eq!(bals.len(), 1);
        assert_eq!(bals[0].amount.number, dec!(57.00));
        assert_eq!(bals[0].date, ymd(2024, 8, 3));
    }

    #[test]
    fn test_fee_moves_money_to_fee_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &["TRANSFER,2024-08-01 10:00:00,Wire,-10.00,0.50,EUR,89.50"],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        let txn = transactions(&entries)[0];
        let postings: Vec<(&str, rust_decimal::Decimal)> = txn
            .postings
            .iter()
            .map(|p| (p.account.as_str(), p.units.number))
            .collect();
        assert_eq!(
            postings,
            vec![
                ("Assets:Revolut:EUR", dec!(-10.00)),
                ("Assets:Revolut:EUR", dec!(-0.50)),
                ("Expenses:Revolut:Fee", dec!(0.50)),
            ]
        );
    }

    #[test]
    fn test_skip_rows_produce_no_transaction_but_keep_balance() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &[
                "TOPUP,2024-08-01 10:00:00,Top-Up,10.00,0.00,EUR,10.00",
                "INTERNAL,2024-08-05 10:00:00,Vault,-5.00,0.00,EUR,5.00",
            ],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        assert_eq!(transactions(&entries).len(), 1);
        let bals = balances(&entries);
        assert_eq!(bals[0].amount.number, dec!(5.00));
        assert_eq!(bals[0].date, ymd(2024, 8, 6));
    }

    #[test]
    fn test_only_skip_rows_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &["INTERNAL,2024-08-05 10:00:00,Vault,-5.00,0.00,EUR,5.00"],
        );
        assert!(importer().extract(&path, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_latest_balance_per_currency_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &[
                "TOPUP,2024-08-03 10:00:00,A,1.00,0.00,EUR,30.00",
                "TOPUP,2024-08-01 10:00:00,B,1.00,0.00,EUR,10.00",
                "TOPUP,2024-08-02 10:00:00,C,1.00,0.00,CHF,7.00",
                "TOPUP,2024-08-03 18:00:00,D,1.00,0.00,EUR,31.00",
            ],
        );
        let entries = importer().extract(&path, &[]).unwrap();
        let bals = balances(&entries);
        assert_eq!(bals.len(), 2);
        // BTreeMap order: CHF before EUR.
        assert_eq!(bals[0].amount, Amount::new(dec!(7.00), Currency::Chf));
        assert_eq!(bals[1].amount, Amount::new(dec!(31.00), Currency::Eur));
        assert_eq!(bals[1].date, ymd(2024, 8, 4));
        // Balances come after every transaction.
        assert!(matches!(entries[4], Directive::Balance(_)));
        assert!(matches!(entries[3], Directive::Transaction(_)));
    }

    #[test]
    fn test_row_error_aborts_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_statement(
            dir.path(),
            &[
                "TOPUP,2024-08-01 10:00:00,Top-Up,10.00,0.00,EUR,10.00",
                "REFUND,2024-08-02 10:00:00,Refund,3.00,0.00,EUR,13.00",
            ],
        );
        assert!(matches!(
            importer().extract(&path, &[]),
            Err(ImportError::UnknownTransactionType(_))
        ));
    }

    #[test]
    fn test_delegates_file_questions() {
        let imp = importer();
        let path = Path::new("/dl/stmt_2024-09-02.csv");
        assert_eq!(imp.date(path).unwrap(), ymd(2024, 9, 2));
        assert_eq!(imp.filename(path), "stmt_2024-09-02.csv");
        assert_eq!(imp.account(path), "Assets:Revolut:EUR");
        assert!(!imp.identify(Path::new("/dl/other.csv")).unwrap());
    }
}
