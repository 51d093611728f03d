//! Receipt data models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::categorize::ExpenseCategory;
use crate::error::RecordError;
use crate::models::money::Money;

/// A single purchased item on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item description as printed, minus price and quantity notation.
    pub description: String,

    /// Unit price magnitude.
    pub price: Money,

    /// Purchase quantity; defaults to 1 when no multiplier notation is
    /// present.
    pub quantity: u32,

    /// Category assigned by the downstream classifier, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
}

impl ReceiptItem {
    /// Validating constructor; quantity must be at least 1.
    pub fn new(
        description: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Result<Self, RecordError> {
        if quantity == 0 {
            return Err(RecordError::InvalidQuantity { value: quantity });
        }
        Ok(Self {
            description: description.into(),
            price,
            quantity,
            category: None,
        })
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// A fully extracted receipt. Constructed once per document and immutable
/// thereafter; ownership passes to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Store name, or the literal "Unknown Store" sentinel.
    pub store_name: String,

    /// Receipt date; falls back to the processing timestamp when the
    /// document carries no recognizable date.
    pub date: NaiveDateTime,

    /// Line items in document order.
    pub items: Vec<ReceiptItem>,

    /// Pre-tax subtotal; zero when absent and not derivable.
    pub subtotal: Money,

    /// Total tax; multiple tax lines are summed.
    pub tax: Money,

    /// Grand total; zero when absent and not derivable.
    pub total: Money,

    /// The original input text.
    pub raw_text: String,
}

impl Receipt {
    /// Whether the soft invariant `total == subtotal + tax` holds exactly.
    /// Reconciliation maintains this when at most one of the three was
    /// missing; garbage input can leave it false.
    pub fn totals_consistent(&self) -> bool {
        self.total == self.subtotal + self.tax
    }
}
