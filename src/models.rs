use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Currencies an importer is allowed to emit. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CHF")]
    Chf,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "SEK")]
    Sek,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Chf,
        Currency::Eur,
        Currency::Sek,
        Currency::Usd,
        Currency::Gbp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Chf => "CHF",
            Self::Eur => "EUR",
            Self::Sek => "SEK",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
        }
    }
}

impl FromStr for Currency {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.code() == s)
            .copied()
            .ok_or_else(|| ImportError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Transfer,
    Exchange,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub number: Decimal,
    pub currency: Currency,
}

impl Amount {
    pub fn new(number: Decimal, currency: Currency) -> Self {
        Self { number, currency }
    }

    pub fn is_zero(&self) -> bool {
        self.number.is_zero()
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount::new(-self.number, self.currency)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

/// One line of a statement, keyed by column name in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated column name keeps its first position but takes the later
    /// value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// ---------------------------------------------------------------------------
// Ledger directives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub filename: String,
    pub lineno: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Okay,
    Warning,
}

impl Flag {
    pub fn symbol(&self) -> char {
        match self {
            Self::Okay => '*',
            Self::Warning => '!',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub units: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub flag: Flag,
    pub payee: Option<String>,
    pub narration: Option<String>,
    pub transaction_type: TransactionType,
    pub postings: Vec<Posting>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub account: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Transaction(Transaction),
    Balance(Balance),
}

impl Directive {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Transaction(txn) => txn.date,
            Self::Balance(bal) => bal.date,
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Transaction(txn) => Some(txn),
            Self::Balance(_) => None,
        }
    }

    pub fn as_balance(&self) -> Option<&Balance> {
        match self {
            Self::Balance(bal) => Some(bal),
            Self::Transaction(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_code() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("GBP".parse::<Currency>().unwrap(), Currency::Gbp);
        assert!("eur".parse::<Currency>().is_err());
        assert!("JPY".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::Chf).unwrap();
        assert_eq!(json, "\"CHF\"");
        let c: Currency = serde_json::from_str("\"SEK\"").unwrap();
        assert_eq!(c, Currency::Sek);
    }

    #[test]
    fn test_row_keeps_column_order_and_last_value() {
        let row: Row = [("b", "2"), ("a", "1"), ("b", "3")].into_iter().collect();
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(row.get("b"), Some("3"));
        assert_eq!(row.get("c"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_amount_negation() {
        let a = Amount::new(Decimal::new(5000, 2), Currency::Eur);
        assert_eq!((-a).number, Decimal::new(-5000, 2));
        assert_eq!(a.to_string(), "50.00 EUR");
    }
}
