//! Document extraction engine.
//!
//! Raw text or cell grids flow through the rule primitives and the line
//! classifier into one of two pipelines: receipts and bank statements. Every
//! public operation is total — malformed input degrades to an empty or
//! zeroed result, never an error.

pub mod lines;
pub mod rules;

mod receipt;
mod statement;

pub use lines::{classify_line, group_lines, LineClass};
pub use receipt::ReceiptExtractor;
pub use statement::{ColumnRoles, StatementExtractor};
