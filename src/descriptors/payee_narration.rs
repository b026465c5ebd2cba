use super::{require_keys, PayeeNarrationDescriptor};
use crate::error::Result;
use crate::models::Row;
use crate::text::{clean_text, reduce_whitespace, shorten_text, UNLIMITED};

/// Clean one free-text cell. Absent and empty cells both become "".
fn normalize(row: &Row, key: &str, max_length: i64) -> Result<String> {
    let raw = row.get(key).unwrap_or_default();
    shorten_text(&reduce_whitespace(&clean_text(raw)), max_length)
}

#[derive(Debug, Clone)]
pub struct FromPayeeNarration {
    pub payee_key: String,
    pub narration_key: String,
    pub max_payee_length: i64,
    pub max_narration_length: i64,
}

impl FromPayeeNarration {
    pub fn new(payee_key: &str, narration_key: &str) -> Self {
        Self {
            payee_key: payee_key.to_string(),
            narration_key: narration_key.to_string(),
            max_payee_length: UNLIMITED,
            max_narration_length: UNLIMITED,
        }
    }

    pub fn max_lengths(mut self, payee: i64, narration: i64) -> Self {
        self.max_payee_length = payee;
        self.max_narration_length = narration;
        self
    }
}

impl PayeeNarrationDescriptor for FromPayeeNarration {
    fn extract(&self, row: &Row) -> Result<(Option<String>, Option<String>)> {
        require_keys(row, &[self.payee_key.as_str(), self.narration_key.as_str()])?;
        let payee = normalize(row, &self.payee_key, self.max_payee_length)?;
        let narration = normalize(row, &self.narration_key, self.max_narration_length)?;
        Ok((Some(payee), Some(narration)))
    }
}

#[derive(Debug, Clone)]
pub struct FromPayee {
    pub payee_key: String,
    pub max_payee_length: i64,
}

impl FromPayee {
    pub fn new(payee_key: &str) -> Self {
        Self {
            payee_key: payee_key.to_string(),
            max_payee_length: UNLIMITED,
        }
    }

    pub fn max_length(mut self, max_length: i64) -> Self {
        self.max_payee_length = max_length;
        self
    }
}

impl PayeeNarrationDescriptor for FromPayee {
    fn extract(&self, row: &Row) -> Result<(Option<String>, Option<String>)> {
        require_keys(row, &[self.payee_key.as_str()])?;
        let payee = normalize(row, &self.payee_key, self.max_payee_length)?;
        Ok((Some(payee), None))
    }
}

#[derive(Debug, Clone)]
pub struct FromNarration {
    pub narration_key: String,
    pub max_narration_length: i64,
}

impl FromNarration {
    pub fn new(narration_key: &str) -> Self {
        Self {
            narration_key: narration_key.to_string(),
            max_narration_length: UNLIMITED,
        }
    }

    pub fn max_length(mut self, max_length: i64) -> Self {
        self.max_narration_length = max_length;
        self
    }
}

impl PayeeNarrationDescriptor for FromNarration {
    fn extract(&self, row: &Row) -> Result<(Option<String>, Option<String>)> {
        require_keys(row, &[self.narration_key.as_str()])?;
        let narration = normalize(row, &self.narration_key, self.max_narration_length)?;
        Ok((None, Some(narration)))
    }
}
