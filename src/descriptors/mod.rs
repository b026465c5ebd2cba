//! Row-level extraction strategies.
//!
//! Each capability is a narrow trait with one operation. A bank
//! configuration picks one concrete strategy per slot on
//! [`BankingImporter`](crate::importer::BankingImporter).

pub mod amount;
pub mod date;
pub mod file;
pub mod payee_narration;
pub mod transaction_type;

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{ImportError, Result};
use crate::models::{Amount, Row, TransactionType};

pub use amount::{CurrencySource, FromAmount, FromDepositWithdraw, FromSignAmount};
pub use date::{FromDate, FromPostingTransactionDate};
#[cfg(feature = "xlsx")]
pub use file::FileDescriptionXlsx;
pub use file::{FileDescriptionCsv, FileSpec};
pub use payee_narration::{FromNarration, FromPayee, FromPayeeNarration};
pub use transaction_type::FromTransactionType;

pub trait AmountDescriptor: Send + Sync {
    fn extract(&self, row: &Row) -> Result<Amount>;
}

pub trait DateDescriptor: Send + Sync {
    /// `Ok(None)` means the row carries no usable date and should be dropped.
    fn extract(&self, row: &Row) -> Result<Option<NaiveDate>>;
}

pub trait TransactionTypeDescriptor: Send + Sync {
    fn extract(&self, row: &Row) -> Result<TransactionType>;
}

pub trait PayeeNarrationDescriptor: Send + Sync {
    fn extract(&self, row: &Row) -> Result<(Option<String>, Option<String>)>;
}

/// Recognises and reads one bank's statement file format.
pub trait FileDescription: Send + Sync {
    fn identify(&self, filepath: &Path) -> Result<bool>;
    fn date(&self, filepath: &Path) -> Result<NaiveDate>;
    fn name(&self, filepath: &Path) -> String;
    fn read(&self, filepath: &Path) -> Result<Vec<Row>>;
}

pub(crate) fn require_keys(row: &Row, keys: &[&str]) -> Result<()> {
    for key in keys {
        if !row.contains_key(key) {
            return Err(ImportError::MissingKey(key.to_string()));
        }
    }
    Ok(())
}

/// Fetch a column that [`require_keys`] has not necessarily checked.
pub(crate) fn field<'a>(row: &'a Row, key: &str) -> Result<&'a str> {
    row.get(key)
        .ok_or_else(|| ImportError::MissingKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_keys_reports_first_missing() {
        let row: Row = [("a", "1"), ("b", "2")].into_iter().collect();
        assert!(require_keys(&row, &["a", "b"]).is_ok());
        match require_keys(&row, &["a", "c", "d"]) {
            Err(ImportError::MissingKey(k)) => assert_eq!(k, "c"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
