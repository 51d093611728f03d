//! Rule-based primitive extractors shared by the receipt and statement
//! pipelines.
//!
//! All of these are pure and total: absence of a value is `None` or an empty
//! vector, never an error.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod quantity;

pub use amounts::{find_all_amounts, find_last_amount, format_amount, format_amount_grouped, parse_amount};
pub use dates::{find_date, find_date_ordered, parse_date_str};
pub use quantity::find_quantity;
