use super::{field, require_keys, TransactionTypeDescriptor};
use crate::error::{ImportError, Result};
use crate::models::{Row, TransactionType};

/// Classify a row by looking its raw type code up in a label table.
///
/// The table is searched in order and the first type listing the code wins.
/// Codes that appear nowhere are an error rather than a default.
#[derive(Debug, Clone)]
pub struct FromTransactionType {
    pub key: String,
    pub mapping: Vec<(TransactionType, Vec<String>)>,
}

impl FromTransactionType {
    pub fn new<I, L, S>(key: &str, mapping: I) -> Self
    where
        I: IntoIterator<Item = (TransactionType, L)>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.to_string(),
            mapping: mapping
                .into_iter()
                .map(|(tt, labels)| (tt, labels.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

impl TransactionTypeDescriptor for FromTransactionType {
    fn extract(&self, row: &Row) -> Result<TransactionType> {
        require_keys(row, &[self.key.as_str()])?;
        let raw = field(row, &self.key)?;
        self.mapping
            .iter()
            .find(|(_, labels)| labels.iter().any(|l| l == raw))
            .map(|(tt, _)| *tt)
            .ok_or_else(|| ImportError::UnknownTransactionType(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revolut_types() -> FromTransactionType {
        FromTransactionType::new(
            "Type",
            [
                (TransactionType::Exchange, vec!["EXCHANGE"]),
                (TransactionType::Transfer, vec!["TOPUP", "CARD_PAYMENT", "TRANSFER"]),
                (TransactionType::Skip, vec![]),
            ],
        )
    }

    #[test]
    fn test_known_labels() {
        let d = revolut_types();
        let row: Row = [("Type", "TOPUP")].into_iter().collect();
        assert_eq!(d.extract(&row).unwrap(), TransactionType::Transfer);
        let row: Row = [("Type", "EXCHANGE")].into_iter().collect();
        assert_eq!(d.extract(&row).unwrap(), TransactionType::Exchange);
    }

    #[test]
    fn test_labels_are_case_sensitive_and_unknown_fails() {
        let d = revolut_types();
        let row: Row = [("Type", "topup")].into_iter().collect();
        match d.extract(&row) {
            Err(ImportError::UnknownTransactionType(raw)) => assert_eq!(raw, "topup"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_first_mapping_entry_wins() {
        let d = FromTransactionType::new(
            "Code",
            [
                (TransactionType::Skip, vec!["BA"]),
                (TransactionType::Transfer, vec!["BA", "OV"]),
            ],
        );
        let row: Row = [("Code", "BA")].into_iter().collect();
        assert_eq!(d.extract(&row).unwrap(), TransactionType::Skip);
    }

    #[test]
    fn test_missing_column() {
        let row: Row = [("Kind", "TOPUP")].into_iter().collect();
        assert!(matches!(revolut_types().extract(&row), Err(ImportError::MissingKey(_))));
    }
}
