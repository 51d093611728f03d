//! Signed amount recognition and canonical formatting.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::AMOUNT_PATTERN;

/// Find every amount in `text`, in left-to-right order, keeping the sign.
/// Currency symbols and thousands separators are tolerated. Matches never
/// overlap, and nothing beyond that is de-duplicated.
pub fn find_all_amounts(text: &str) -> Vec<Decimal> {
    AMOUNT_PATTERN
        .find_iter(text)
        .filter_map(|m| parse_amount(m.as_str()))
        .collect()
}

/// The last amount in `text`, if any. Statement lines place the transaction
/// amount after ancillary numbers, so "last" is the useful one.
pub fn find_last_amount(text: &str) -> Option<Decimal> {
    find_all_amounts(text).pop()
}

/// Parse a single already-matched amount string ("-$1,234.56") into a signed
/// decimal.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Canonical plain rendering of a magnitude: "6.75", "1234.56".
pub fn format_amount(amount: Decimal) -> String {
    let mut v = amount.abs().round_dp(2);
    v.rescale(2);
    v.to_string()
}

/// Comma-grouped rendering of a magnitude: "1,234.56".
pub fn format_amount_grouped(amount: Decimal) -> String {
    let plain = format_amount(amount);
    let (integer_part, decimal_part) = match plain.split_once('.') {
        Some(parts) => parts,
        None => return plain,
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}.{}", grouped, decimal_part)
}
