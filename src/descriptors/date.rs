use chrono::NaiveDate;

use super::{field, require_keys, DateDescriptor};
use crate::error::{ImportError, Result};
use crate::models::Row;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `value` with a strftime-style format. Time fields in the format are
/// accepted and thrown away.
fn parse_date(key: &str, value: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format).map_err(|_| ImportError::InvalidDate {
        key: key.to_string(),
        value: value.to_string(),
        format: format.to_string(),
    })
}

/// A single date column. Rows whose value equals `empty_date` have no date,
/// which is how pending card payments show up in some exports.
#[derive(Debug, Clone)]
pub struct FromDate {
    pub key: String,
    pub format: String,
    pub empty_date: String,
}

impl FromDate {
    pub fn new(key: &str, format: &str) -> Self {
        Self {
            key: key.to_string(),
            format: format.to_string(),
            empty_date: String::new(),
        }
    }

    pub fn empty_date(mut self, sentinel: &str) -> Self {
        self.empty_date = sentinel.to_string();
        self
    }
}

impl DateDescriptor for FromDate {
    fn extract(&self, row: &Row) -> Result<Option<NaiveDate>> {
        require_keys(row, &[self.key.as_str()])?;
        let value = field(row, &self.key)?;
        if value == self.empty_date {
            return Ok(None);
        }
        parse_date(&self.key, value, &self.format).map(Some)
    }
}

/// Booking and value date columns sharing one format. The booking (posting)
/// date may not fall after the transaction date.
#[derive(Debug, Clone)]
pub struct FromPostingTransactionDate {
    pub posting_key: String,
    pub transaction_key: String,
    pub format: String,
}

impl FromPostingTransactionDate {
    pub fn new(posting_key: &str, transaction_key: &str, format: &str) -> Self {
        Self {
            posting_key: posting_key.to_string(),
            transaction_key: transaction_key.to_string(),
            format: format.to_string(),
        }
    }

    pub fn extract_pair(&self, row: &Row) -> Result<(NaiveDate, NaiveDate)> {
        require_keys(row, &[self.posting_key.as_str(), self.transaction_key.as_str()])?;
        let posting = parse_date(&self.posting_key, field(row, &self.posting_key)?, &self.format)?;
        let transaction = parse_date(
            &self.transaction_key,
            field(row, &self.transaction_key)?,
            &self.format,
        )?;
        if posting > transaction {
            return Err(ImportError::DateOrder {
                posting,
                transaction,
            });
        }
        Ok((posting, transaction))
    }
}

impl DateDescriptor for FromPostingTransactionDate {
    fn extract(&self, row: &Row) -> Result<Option<NaiveDate>> {
        self.extract_pair(row).map(|(posting, _)| Some(posting))
    }
}
