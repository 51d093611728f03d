//! Core library for financial document extraction.
//!
//! This crate provides:
//! - Rule-based primitives for date, amount, and quantity recognition
//! - Line classification and transaction line grouping
//! - Receipt extraction with subtotal/tax/total reconciliation
//! - Bank statement extraction over per-page table grids and text blobs
//! - The expense categorization contract with a keyword rule engine

pub mod categorize;
pub mod error;
pub mod extract;
pub mod models;

pub use error::{BillfoldError, CategorizeError, RecordError, Result};
pub use models::config::{DateOrder, ExtractConfig};
pub use models::money::Money;
pub use models::receipt::{Receipt, ReceiptItem};
pub use models::statement::{BankTransaction, Page, Table, TransactionType};
pub use extract::{classify_line, group_lines, LineClass, ReceiptExtractor, StatementExtractor};
pub use extract::rules::{find_all_amounts, find_date, find_quantity};
pub use categorize::{
    categorize_or_fallback, Categorizer, CategorizeRequest, ClassifiedItem, ExpenseCategory,
    KeywordCategorizer,
};
