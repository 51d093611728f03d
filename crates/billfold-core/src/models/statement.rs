//! Bank statement data models: input pages and extracted transactions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// Direction of a bank transaction, derived from the sign of the raw
/// extracted amount (negative means debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }
}

/// A grid of string cells extracted from a statement page, row-major with
/// the header (real or presumed) at row 0.
pub type Table = Vec<Vec<String>>;

/// One statement page as handed over by the external PDF collaborator:
/// zero or more extracted tables, and optionally the page's raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Extracted table grids, if the collaborator found any.
    #[serde(default)]
    pub tables: Vec<Table>,

    /// The page's text blob, if available.
    #[serde(default)]
    pub text: Option<String>,
}

impl Page {
    /// Page with text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            tables: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Page with tables only.
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self {
            tables,
            text: None,
        }
    }
}

/// A single extracted bank transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Transaction date.
    pub date: NaiveDateTime,

    /// Cleaned description text.
    pub description: String,

    /// Magnitude of the transaction; always non-negative.
    pub amount: Money,

    /// Debit or credit, from the sign of the raw amount.
    pub transaction_type: TransactionType,

    /// Category label assigned downstream, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The source text this transaction was extracted from.
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_deserializes_with_defaults() {
        let page: Page = serde_json::from_str(r#"{"text": "JAN STATEMENT"}"#).unwrap();
        assert!(page.tables.is_empty());
        assert_eq!(page.text.as_deref(), Some("JAN STATEMENT"));

        let page: Page = serde_json::from_str(r#"{"tables": [[["Date","Amount"]]]}"#).unwrap();
        assert_eq!(page.tables.len(), 1);
        assert!(page.text.is_none());
    }

    #[test]
    fn transaction_type_labels() {
        assert_eq!(TransactionType::Debit.as_str(), "debit");
        assert_eq!(
            serde_json::to_string(&TransactionType::Credit).unwrap(),
            "\"credit\""
        );
    }
}
