//! Expense categorization contract.
//!
//! The extraction engine itself never categorizes; it hands `{description,
//! price}` pairs to a collaborator behind the [`Categorizer`] trait. That
//! collaborator may be a local rule engine ([`KeywordCategorizer`]) or a
//! remote model; callers must tolerate it being unavailable and fall back to
//! [`fallback_classifications`].

mod keyword;

pub use keyword::KeywordCategorizer;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CategorizeError;
use crate::models::money::Money;
use crate::models::receipt::Receipt;

/// Expense categories understood by the budgeting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Groceries,
    Household,
    PersonalCare,
    Health,
    Electronics,
    Clothing,
    Entertainment,
    Dining,
    Pets,
    Transportation,
    Utilities,
    Office,
    Miscellaneous,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Household => "household",
            ExpenseCategory::PersonalCare => "personal_care",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Electronics => "electronics",
            ExpenseCategory::Clothing => "clothing",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Dining => "dining",
            ExpenseCategory::Pets => "pets",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Office => "office",
            ExpenseCategory::Miscellaneous => "miscellaneous",
        }
    }
}

/// One item handed to the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemToCategorize {
    pub description: String,
    pub price: Money,
}

/// Everything the collaborator gets to see for one receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub store_name: String,
    pub total_amount: Money,
    pub items: Vec<ItemToCategorize>,
}

impl CategorizeRequest {
    pub fn from_receipt(receipt: &Receipt) -> Self {
        Self {
            store_name: receipt.store_name.clone(),
            total_amount: receipt.total,
            items: receipt
                .items
                .iter()
                .map(|i| ItemToCategorize {
                    description: i.description.clone(),
                    price: i.price,
                })
                .collect(),
        }
    }
}

/// Per-item classification returned by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub description: String,
    pub category: ExpenseCategory,
    /// Confidence in [0, 1].
    pub confidence: f32,
    pub reasoning: String,
    pub original_price: Money,
}

/// The downstream classification collaborator. Implementations return one
/// classification per request item, in request order.
pub trait Categorizer {
    fn categorize(
        &self,
        request: &CategorizeRequest,
    ) -> Result<Vec<ClassifiedItem>, CategorizeError>;
}

/// The "collaborator unavailable" default: every item is miscellaneous with
/// zero confidence.
pub fn fallback_classifications(request: &CategorizeRequest) -> Vec<ClassifiedItem> {
    request
        .items
        .iter()
        .map(|item| ClassifiedItem {
            description: item.description.clone(),
            category: ExpenseCategory::Miscellaneous,
            confidence: 0.0,
            reasoning: "categorization unavailable".to_string(),
            original_price: item.price,
        })
        .collect()
}

/// Run the collaborator, degrading to [`fallback_classifications`] on any
/// failure.
pub fn categorize_or_fallback(
    categorizer: &dyn Categorizer,
    request: &CategorizeRequest,
) -> Vec<ClassifiedItem> {
    match categorizer.categorize(request) {
        Ok(classified) => classified,
        Err(e) => {
            warn!(error = %e, "categorizer failed, using uncategorized fallback");
            fallback_classifications(request)
        }
    }
}

/// Fold classifications back into a receipt, matching items by order.
/// Consumes the receipt; extraction results stay immutable otherwise.
pub fn apply_to_receipt(mut receipt: Receipt, classified: &[ClassifiedItem]) -> Receipt {
    for (item, classification) in receipt.items.iter_mut().zip(classified) {
        item.category = Some(classification.category);
    }
    receipt
}
