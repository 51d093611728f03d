//! Line classification and transaction line grouping.

use super::rules::patterns::{
    AMOUNT_PATTERN, DISCOUNT_KEYWORDS, SUBTOTAL_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS,
    TRANSACTION_MARKERS,
};
use super::rules::{find_all_amounts, find_date};

/// What a single text line is, as far as the extractors care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Blank, or nothing recognizable.
    Noise,
    /// Mentions a subtotal keyword.
    Subtotal,
    /// Mentions a tax keyword.
    Tax,
    /// Mentions a discount keyword.
    Discount,
    /// Mentions a total keyword.
    Total,
    /// No reserved keyword, but carries an amount.
    ItemCandidate,
}

/// Keyword sets in classification priority order. Subtotal must come before
/// total so a "SUBTOTAL" line is never claimed by the "total" keyword.
const KEYWORD_CLASSES: [(&[&str], LineClass); 4] = [
    (SUBTOTAL_KEYWORDS, LineClass::Subtotal),
    (TAX_KEYWORDS, LineClass::Tax),
    (DISCOUNT_KEYWORDS, LineClass::Discount),
    (TOTAL_KEYWORDS, LineClass::Total),
];

/// Classify a line by case-insensitive keyword containment, walking
/// [`KEYWORD_CLASSES`] in order. Total over all inputs.
pub fn classify_line(line: &str) -> LineClass {
    let lowered = line.to_lowercase();
    if lowered.trim().is_empty() {
        return LineClass::Noise;
    }

    for (keywords, class) in KEYWORD_CLASSES {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return class;
        }
    }

    if AMOUNT_PATTERN.is_match(line) {
        LineClass::ItemCandidate
    } else {
        LineClass::Noise
    }
}

/// Group free-text statement lines into runs that each describe one
/// transaction.
///
/// A line containing a date opens a new group (closing any open one). Lines
/// carrying an amount or a transaction marker extend the open group. Any
/// other non-blank line closes the open group without starting a new one;
/// dateless lines with no open group are dropped. Single left-to-right pass.
pub fn group_lines(lines: &[&str]) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if find_date(line).is_some() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.push(line.to_string());
        } else if !current.is_empty() && extends_transaction(line) {
            current.push(line.to_string());
        } else if !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

fn extends_transaction(line: &str) -> bool {
    if !find_all_amounts(line).is_empty() {
        return true;
    }
    let lowered = line.to_lowercase();
    TRANSACTION_MARKERS.iter().any(|p| p.is_match(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total_and_prioritized() {
        assert_eq!(classify_line(""), LineClass::Noise);
        assert_eq!(classify_line("   "), LineClass::Noise);
        assert_eq!(classify_line("THANK YOU"), LineClass::Noise);
        assert_eq!(classify_line("TOTAL $7.00"), LineClass::Total);
        // subtotal wins over the "total" substring
        assert_eq!(classify_line("SUBTOTAL $6.48"), LineClass::Subtotal);
        assert_eq!(classify_line("Sub-Total 6.48"), LineClass::Subtotal);
        assert_eq!(classify_line("SALES TAX $0.52"), LineClass::Tax);
        assert_eq!(classify_line("MEMBER SAVINGS -1.00"), LineClass::Discount);
        assert_eq!(classify_line("MILK 2% $3.99"), LineClass::ItemCandidate);
    }

    #[test]
    fn classification_is_idempotent() {
        for line in ["SUBTOTAL $6.48", "BREAD $2.49", "random words", ""] {
            assert_eq!(classify_line(line), classify_line(line));
        }
    }

    #[test]
    fn groups_start_at_dates() {
        let lines = vec![
            "ACCOUNT SUMMARY",
            "01/15/2024 POS DEBIT CARD PURCHASE",
            "STARBUCKS #4421 -$6.75",
            "01/16/2024 DEPOSIT $120.00",
        ];
        let groups = group_lines(&lines);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1], vec!["01/16/2024 DEPOSIT $120.00"]);
    }

    #[test]
    fn unrelated_line_closes_group() {
        let lines = vec![
            "01/15/2024 CHECK #1024 $50.00",
            "PAGE FOOTER TEXT",
            "CONTINUED OVERLEAF",
        ];
        let groups = group_lines(&lines);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn group_invariants_hold() {
        let lines = vec![
            "garbage header",
            "",
            "01/15/2024 WITHDRAWAL",
            "ATM #2231 -$40.00",
            "interleaved noise line",
            "more noise",
            "2024-02-01 TRANSFER $5.00",
        ];
        let groups = group_lines(&lines);
        assert!(!groups.is_empty());
        for group in &groups {
            assert!(!group.is_empty());
            assert!(find_date(&group[0]).is_some());
        }
    }

    #[test]
    fn dateless_lines_without_open_group_are_dropped() {
        let groups = group_lines(&["no date here $5.00", "still nothing"]);
        assert!(groups.is_empty());
    }
}
