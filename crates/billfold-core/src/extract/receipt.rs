//! End-to-end receipt extraction: cleaned OCR text in, `Receipt` out.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::models::config::ExtractConfig;
use crate::models::money::Money;
use crate::models::receipt::{Receipt, ReceiptItem};

use super::lines::{classify_line, LineClass};
use super::rules::patterns::{
    ALL_DIGITS, AMOUNT_PATTERN, DATE_PATTERNS, LEADING_DIGITS, NOISE_GLYPHS, QUANTITY_PATTERN,
    QUANTITY_PREFIX, SUBTOTAL_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS,
};
use super::rules::{find_date_ordered, find_last_amount, find_quantity, parse_amount};

/// Receipt extraction pipeline.
///
/// `extract` is a total function: malformed input degrades to an empty item
/// list and zero totals, never an error.
pub struct ReceiptExtractor {
    config: ExtractConfig,
    fallback_date: Option<NaiveDateTime>,
}

impl ReceiptExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    pub fn with_config(config: ExtractConfig) -> Self {
        Self {
            config,
            fallback_date: None,
        }
    }

    /// Override the timestamp used when the document carries no
    /// recognizable date. Defaults to the processing time.
    pub fn with_fallback_date(mut self, date: NaiveDateTime) -> Self {
        self.fallback_date = Some(date);
        self
    }

    /// Parse receipt text into a structured [`Receipt`].
    pub fn extract(&self, raw_text: &str) -> Receipt {
        let lines = normalize_lines(raw_text);

        let store_name = self.extract_store_name(&lines);
        // The original text keeps spacing the normalization may have eaten.
        let date = find_date_ordered(raw_text, self.config.date_order)
            .or(self.fallback_date)
            .unwrap_or_else(|| Local::now().naive_local());

        let items = self.extract_items(&lines);
        let (subtotal, tax, total) = self.extract_totals(&lines);

        debug!(
            store = %store_name,
            items = items.len(),
            %total,
            "extracted receipt"
        );

        Receipt {
            store_name,
            date,
            items,
            subtotal,
            tax,
            total,
            raw_text: raw_text.to_string(),
        }
    }

    /// First of the leading lines that plausibly names the store: not a
    /// date, not over-long, no amount, not just digits.
    fn extract_store_name(&self, lines: &[String]) -> String {
        for line in lines.iter().take(self.config.store_name_scan_lines) {
            if DATE_PATTERNS.iter().any(|p| p.is_match(line)) {
                continue;
            }
            if line.chars().count() > self.config.store_name_max_len {
                continue;
            }
            if AMOUNT_PATTERN.is_match(line) {
                continue;
            }
            if ALL_DIGITS.is_match(line) {
                continue;
            }
            return line.clone();
        }
        "Unknown Store".to_string()
    }

    fn extract_items(&self, lines: &[String]) -> Vec<ReceiptItem> {
        let mut items = Vec::new();
        let mut quantity: u32 = 1;

        for line in lines {
            match classify_line(line) {
                LineClass::Total
                | LineClass::Subtotal
                | LineClass::Tax
                | LineClass::Discount => continue,
                LineClass::Noise | LineClass::ItemCandidate => {}
            }

            // A quantity marker sets the multiplier for the next priced line.
            let quantity_marker = find_quantity(line);
            if let Some(q) = quantity_marker {
                quantity = q;
            }

            let Some(price_match) = AMOUNT_PATTERN.find(line) else {
                continue;
            };
            let Some(value) = parse_amount(price_match.as_str()) else {
                continue;
            };

            let description = clean_item_description(&line[..price_match.start()]);
            if !description.is_empty() && !contains_reserved_keyword(&description) {
                let price = Money::saturating_from(value.abs());
                if let Ok(item) = ReceiptItem::new(description, price, quantity) {
                    items.push(item);
                    quantity = 1;
                    continue;
                }
            }

            // A priced line consumes the multiplier even when no item was
            // emitted, unless it is the marker line itself.
            if quantity_marker.is_none() {
                quantity = 1;
            }
        }

        items
    }

    /// Reverse scan for totals: they cluster at the end of the document.
    /// The largest total and subtotal win; tax lines are summed because
    /// receipts may list several (state + local).
    fn extract_totals(&self, lines: &[String]) -> (Money, Money, Money) {
        let mut subtotal = Money::ZERO;
        let mut tax = Money::ZERO;
        let mut total = Money::ZERO;

        for line in lines.iter().rev() {
            match classify_line(line) {
                LineClass::Total => {
                    if let Some(amount) = find_last_amount(line) {
                        let amount = Money::saturating_from(amount.abs());
                        if amount > total {
                            total = amount;
                        }
                    }
                }
                LineClass::Subtotal => {
                    if let Some(amount) = find_last_amount(line) {
                        let amount = Money::saturating_from(amount.abs());
                        if amount > subtotal {
                            subtotal = amount;
                        }
                    }
                }
                LineClass::Tax => {
                    if let Some(amount) = find_last_amount(line) {
                        tax = tax + Money::saturating_from(amount.abs());
                    }
                }
                LineClass::Noise | LineClass::Discount | LineClass::ItemCandidate => {}
            }
        }

        reconcile(subtotal, tax, total)
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive whichever of subtotal/tax/total is missing from the other two.
/// With more than one unknown nothing is inferred.
fn reconcile(subtotal: Money, tax: Money, total: Money) -> (Money, Money, Money) {
    if total.is_zero() && !subtotal.is_zero() && !tax.is_zero() {
        (subtotal, tax, subtotal + tax)
    } else if subtotal.is_zero() && !total.is_zero() && !tax.is_zero() {
        (total.saturating_sub(tax), tax, total)
    } else if tax.is_zero() && !total.is_zero() && !subtotal.is_zero() {
        (subtotal, total.saturating_sub(subtotal), total)
    } else {
        (subtotal, tax, total)
    }
}

/// Split into non-empty trimmed lines, collapse internal whitespace, strip
/// noise glyph runs, and upper-case for matching robustness.
fn normalize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let cleaned = NOISE_GLYPHS.replace_all(&collapsed, "");
            cleaned.trim().to_uppercase()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_item_description(prefix: &str) -> String {
    let stripped = QUANTITY_PATTERN.replace_all(prefix, "");
    let stripped = QUANTITY_PREFIX.replace(stripped.trim(), "");
    let stripped = LEADING_DIGITS.replace(stripped.trim(), "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_reserved_keyword(description: &str) -> bool {
    let lowered = description.to_lowercase();
    TOTAL_KEYWORDS
        .iter()
        .chain(SUBTOTAL_KEYWORDS)
        .chain(TAX_KEYWORDS)
        .any(|k| lowered.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn extracts_complete_receipt() {
        let text = "WALMART\n01/02/2024\nMILK 2% $3.99\nBREAD $2.49\nSUBTOTAL $6.48\nTAX $0.52\nTOTAL $7.00";
        let receipt = ReceiptExtractor::new().extract(text);

        assert_eq!(receipt.store_name, "WALMART");
        assert_eq!(receipt.date, ymd(2024, 1, 2));
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].description, "MILK 2%");
        assert_eq!(receipt.items[0].price, money("3.99"));
        assert_eq!(receipt.items[0].quantity, 1);
        assert_eq!(receipt.items[1].description, "BREAD");
        assert_eq!(receipt.items[1].price, money("2.49"));
        assert_eq!(receipt.subtotal, money("6.48"));
        assert_eq!(receipt.tax, money("0.52"));
        assert_eq!(receipt.total, money("7.00"));
        assert!(receipt.totals_consistent());
        assert_eq!(receipt.raw_text, text);
    }

    #[test]
    fn reconciles_missing_total() {
        let text = "WALMART\n01/02/2024\nMILK 2% $3.99\nBREAD $2.49\nSUBTOTAL $6.48\nTAX $0.52";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.total, money("7.00"));
    }

    #[test]
    fn reconciles_missing_subtotal_and_tax() {
        let (subtotal, tax, total) =
            reconcile(Money::ZERO, money("0.52"), money("7.00"));
        assert_eq!(subtotal, money("6.48"));
        assert_eq!(tax + subtotal, total);

        let (subtotal, tax, total) =
            reconcile(money("6.48"), Money::ZERO, money("7.00"));
        assert_eq!(tax, money("0.52"));
        assert_eq!(subtotal + tax, total);
    }

    #[test]
    fn no_reconciliation_with_two_unknowns() {
        let (subtotal, tax, total) = reconcile(Money::ZERO, Money::ZERO, money("7.00"));
        assert_eq!(subtotal, Money::ZERO);
        assert_eq!(tax, Money::ZERO);
        assert_eq!(total, money("7.00"));
    }

    #[test]
    fn sums_multiple_tax_lines() {
        let text = "SHOP\nSTATE TAX $0.30\nLOCAL TAX $0.22\nSUBTOTAL $6.48";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.tax, money("0.52"));
        // subtotal + summed tax derive the total
        assert_eq!(receipt.total, money("7.00"));
    }

    #[test]
    fn keeps_largest_total() {
        let text = "SHOP\nTOTAL $3.00\nTOTAL $7.00";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.total, money("7.00"));
    }

    #[test]
    fn quantity_marker_applies_to_next_priced_line() {
        let text = "GROCER\n2 @ $3.99\nMILK GALLON $7.98\nBREAD $2.49";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].description, "MILK GALLON");
        assert_eq!(receipt.items[0].quantity, 2);
        assert_eq!(receipt.items[1].quantity, 1);
    }

    #[test]
    fn store_name_fallback() {
        let text = "01/02/2024\n$3.99\n12345\nMILK $3.99";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.store_name, "Unknown Store");
    }

    #[test]
    fn store_name_skips_long_lines() {
        let text = "RETURN POLICY: ALL SALES FINAL AFTER 90 DAYS WITHOUT RECEIPT\nWALGREENS\nMILK $3.99";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.store_name, "WALGREENS");
    }

    #[test]
    fn noise_glyphs_are_stripped() {
        let text = "WALMART\n*** MILK 2% $3.99 ***";
        let receipt = ReceiptExtractor::new().extract(text);
        assert_eq!(receipt.items[0].description, "MILK 2%");
    }

    #[test]
    fn malformed_input_degrades_gracefully() {
        let fallback = ymd(2024, 6, 1);
        let receipt = ReceiptExtractor::new()
            .with_fallback_date(fallback)
            .extract("garbage\nwith no structure at all\n");
        assert_eq!(receipt.store_name, "GARBAGE");
        assert_eq!(receipt.date, fallback);
        assert!(receipt.items.is_empty());
        assert_eq!(receipt.total, Money::ZERO);
        assert_eq!(receipt.subtotal, Money::ZERO);
        assert_eq!(receipt.tax, Money::ZERO);
    }

    #[test]
    fn keyword_lines_never_become_items() {
        let text = "SHOP\nAMOUNT DUE $9.99\nCASH PAYMENT $10.00\nCHANGE 0.01";
        let receipt = ReceiptExtractor::new().extract(text);
        assert!(receipt.items.iter().all(|i| i.description != "AMOUNT DUE"));
        assert!(receipt.items.iter().all(|i| i.description != "CASH PAYMENT"));
    }
}
