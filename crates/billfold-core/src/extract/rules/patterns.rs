//! Canonical regex patterns and keyword sets for financial document extraction.
//!
//! Every ordering here is load-bearing: date patterns and format tables are
//! tried front to back, amount branches are alternated in priority order, and
//! the line classifier walks the keyword sets subtotal-first. Pure data, no
//! state.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount pattern branches in priority order: signed-with-commas,
/// signed-simple, unsigned-with-commas, unsigned-simple. Joined into a single
/// alternation so discovery is a single left-to-right scan with no
/// overlapping matches.
pub const AMOUNT_PATTERN_PRIORITY: [&str; 4] = [
    r"-\$?\d{1,3}(?:,\d{3})+\.\d{2}",
    r"-\$?\d+\.\d{2}",
    r"\$?\d{1,3}(?:,\d{3})+\.\d{2}",
    r"\$?\d+\.\d{2}",
];

/// Date format strings tried in order when the month-first convention is in
/// effect. `%m/%d/%Y` before `%d/%m/%Y` silently mis-parses day-first
/// documents; see [`DateOrder`](crate::models::config::DateOrder).
pub const DATE_FORMATS_MONTH_FIRST: &[&str] = &[
    "%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%y",
    "%m-%d-%Y", "%d-%m-%Y", "%m-%d-%y", "%Y/%m/%d",
    "%B %d, %Y", "%b %d, %Y", "%B %d %Y", "%b %d %Y",
    "%d %B %Y", "%d %b %Y",
];

/// Date format strings tried in order under the day-first convention.
pub const DATE_FORMATS_DAY_FIRST: &[&str] = &[
    "%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%y",
    "%d-%m-%Y", "%m-%d-%Y", "%d-%m-%y", "%Y/%m/%d",
    "%d %B %Y", "%d %b %Y", "%B %d, %Y", "%b %d, %Y",
    "%B %d %Y", "%b %d %Y",
];

// Keyword sets for line classification. Containment is case-insensitive and
// the classifier checks them in the order subtotal, tax, discount, total so
// a "subtotal" line can never be claimed by the "total" set.
pub const TOTAL_KEYWORDS: &[&str] = &["total", "amount", "sum", "due", "payment", "balance"];
pub const SUBTOTAL_KEYWORDS: &[&str] = &["subtotal", "sub-total", "sub total", "net amount"];
pub const TAX_KEYWORDS: &[&str] = &["tax", "vat", "gst", "hst", "sales tax"];
pub const DISCOUNT_KEYWORDS: &[&str] = &["discount", "savings", "off", "reduced", "coupon"];

// Header synonyms for statement table column role inference.
pub const DATE_HEADER_SYNONYMS: &[&str] = &["date", "time", "posted"];
pub const DESCRIPTION_HEADER_SYNONYMS: &[&str] =
    &["description", "details", "transaction", "particulars"];
pub const AMOUNT_HEADER_SYNONYMS: &[&str] = &["amount", "sum", "debit", "credit", "payment"];

lazy_static! {
    /// Date patterns in recognition order: numeric slash/dash forms before
    /// month-name forms.
    pub static ref DATE_PATTERNS: Vec<Regex> = vec![
        // 01/23/2024, 1-23-24
        Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b").unwrap(),
        // 2024/01/23, 2024-01-23
        Regex::new(r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b").unwrap(),
        // January 23, 2024
        Regex::new(r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2},?\s+\d{4}").unwrap(),
        // 23 January 2024
        Regex::new(r"(?i)\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{4}").unwrap(),
    ];

    /// Optionally signed, optionally comma-grouped two-decimal amounts.
    pub static ref AMOUNT_PATTERN: Regex =
        Regex::new(&AMOUNT_PATTERN_PRIORITY.join("|")).unwrap();

    /// Explicit quantity notation: "3 @ $4.99".
    pub static ref QUANTITY_PATTERN: Regex =
        Regex::new(r"(\d+)\s*@\s*\$?\d+\.\d{2}").unwrap();

    /// Trailing remnant of quantity notation once the price has been split
    /// off a line ("3 @ $" or "3 @").
    pub static ref QUANTITY_PREFIX: Regex =
        Regex::new(r"\d+\s*@\s*\$?\s*$").unwrap();

    /// Lines that may extend an open transaction group even without a date.
    pub static ref TRANSACTION_MARKERS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(?:balance|payment|deposit|withdrawal|transfer|pos|debit|credit|check)\b|#\d+").unwrap(),
        // card/account digit runs
        Regex::new(r"\d{4}").unwrap(),
        Regex::new(r"\$").unwrap(),
    ];

    /// Glyph runs OCR tends to hallucinate on receipts.
    pub static ref NOISE_GLYPHS: Regex = Regex::new(r"[*#]+").unwrap();

    /// Leading digit runs stripped from item descriptions (SKU prefixes).
    pub static ref LEADING_DIGITS: Regex = Regex::new(r"^[\d\s]+").unwrap();

    /// A line consisting of digits and whitespace only.
    pub static ref ALL_DIGITS: Regex = Regex::new(r"^[\d\s]+$").unwrap();
}
