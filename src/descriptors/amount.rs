use rust_decimal::Decimal;

use super::{field, require_keys, AmountDescriptor};
use crate::error::{ImportError, Result};
use crate::models::{Amount, Currency, Row};
use crate::text::{convert_text_to_currency, convert_text_to_decimal, convert_text_to_sign};

/// Where an amount's currency comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencySource {
    /// A column holding the currency code.
    Column(String),
    /// Single-currency statements that never state it per row.
    Fixed(Currency),
}

impl CurrencySource {
    fn key(&self) -> Option<&str> {
        match self {
            Self::Column(key) => Some(key.as_str()),
            Self::Fixed(_) => None,
        }
    }

    fn resolve(&self, row: &Row) -> Result<Currency> {
        match self {
            Self::Column(key) => convert_text_to_currency(field(row, key)?),
            Self::Fixed(currency) => Ok(*currency),
        }
    }
}

fn require_with_currency(row: &Row, keys: &[&str], currency: &CurrencySource) -> Result<()> {
    require_keys(row, keys)?;
    if let Some(key) = currency.key() {
        require_keys(row, &[key])?;
    }
    Ok(())
}

/// A single signed amount column.
#[derive(Debug, Clone)]
pub struct FromAmount {
    pub amount_key: String,
    pub currency: CurrencySource,
}

impl FromAmount {
    pub fn new(amount_key: &str, currency_key: &str) -> Self {
        Self {
            amount_key: amount_key.to_string(),
            currency: CurrencySource::Column(currency_key.to_string()),
        }
    }

    pub fn with_currency(amount_key: &str, currency: Currency) -> Self {
        Self {
            amount_key: amount_key.to_string(),
            currency: CurrencySource::Fixed(currency),
        }
    }
}

impl AmountDescriptor for FromAmount {
    fn extract(&self, row: &Row) -> Result<Amount> {
        require_with_currency(row, &[self.amount_key.as_str()], &self.currency)?;
        let number = convert_text_to_decimal(field(row, &self.amount_key)?)?;
        Ok(Amount::new(number, self.currency.resolve(row)?))
    }
}

/// Separate deposit and withdrawal columns; exactly one may be filled in.
///
/// Withdrawals are taken as written, so banks that export them unsigned end
/// up positive here.
#[derive(Debug, Clone)]
pub struct FromDepositWithdraw {
    pub deposit_key: String,
    pub withdraw_key: String,
    pub currency: CurrencySource,
}

impl FromDepositWithdraw {
    pub fn new(deposit_key: &str, withdraw_key: &str, currency_key: &str) -> Self {
        Self {
            deposit_key: deposit_key.to_string(),
            withdraw_key: withdraw_key.to_string(),
            currency: CurrencySource::Column(currency_key.to_string()),
        }
    }

    pub fn with_currency(deposit_key: &str, withdraw_key: &str, currency: Currency) -> Self {
        Self {
            deposit_key: deposit_key.to_string(),
            withdraw_key: withdraw_key.to_string(),
            currency: CurrencySource::Fixed(currency),
        }
    }
}

impl AmountDescriptor for FromDepositWithdraw {
    fn extract(&self, row: &Row) -> Result<Amount> {
        require_with_currency(row, &[self.deposit_key.as_str(), self.withdraw_key.as_str()], &self.currency)?;
        let deposit_text = field(row, &self.deposit_key)?;
        let withdrawal_text = field(row, &self.withdraw_key)?;
        let deposit = convert_text_to_decimal(deposit_text)?;
        let withdrawal = convert_text_to_decimal(withdrawal_text)?;
        let currency = self.currency.resolve(row)?;

        let number: Decimal = match (deposit.is_zero(), withdrawal.is_zero()) {
            (false, true) => deposit,
            (true, false) => withdrawal,
            _ => {
                return Err(ImportError::AmbiguousAmount {
                    deposit: deposit_text.to_string(),
                    withdrawal: withdrawal_text.to_string(),
                })
            }
        };
        Ok(Amount::new(number, currency))
    }
}

/// An unsigned amount plus a column with a sign word such as `Af`/`Bij`.
#[derive(Debug, Clone)]
pub struct FromSignAmount {
    pub sign_key: String,
    pub amount_key: String,
    pub currency: CurrencySource,
}

impl FromSignAmount {
    pub fn new(sign_key: &str, amount_key: &str, currency_key: &str) -> Self {
        Self {
            sign_key: sign_key.to_string(),
            amount_key: amount_key.to_string(),
            currency: CurrencySource::Column(currency_key.to_string()),
        }
    }

    pub fn with_currency(sign_key: &str, amount_key: &str, currency: Currency) -> Self {
        Self {
            sign_key: sign_key.to_string(),
            amount_key: amount_key.to_string(),
            currency: CurrencySource::Fixed(currency),
        }
    }
}

impl AmountDescriptor for FromSignAmount {
    fn extract(&self, row: &Row) -> Result<Amount> {
        require_with_currency(row, &[self.sign_key.as_str(), self.amount_key.as_str()], &self.currency)?;
        let magnitude = convert_text_to_decimal(field(row, &self.amount_key)?)?;
        let sign = convert_text_to_sign(field(row, &self.sign_key)?)?;
        let currency = self.currency.resolve(row)?;
        Ok(Amount::new(magnitude * Decimal::from(sign), currency))
    }
}
