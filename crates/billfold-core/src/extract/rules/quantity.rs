//! Quantity notation recognition ("3 @ $4.99").

use super::patterns::QUANTITY_PATTERN;

/// Find an explicit quantity multiplier in `text`. Absence means the caller
/// should assume a quantity of 1.
pub fn find_quantity(text: &str) -> Option<u32> {
    QUANTITY_PATTERN
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|&n| n >= 1)
}
