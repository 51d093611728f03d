//! End-to-end bank statement extraction over per-page tables and text.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ExtractConfig;
use crate::models::money::Money;
use crate::models::statement::{BankTransaction, Page, Table};

use super::lines::group_lines;
use super::rules::patterns::{
    AMOUNT_HEADER_SYNONYMS, DATE_HEADER_SYNONYMS, DATE_PATTERNS, DESCRIPTION_HEADER_SYNONYMS,
};
use super::rules::{
    find_all_amounts, find_date, find_date_ordered, format_amount, format_amount_grouped,
};

/// Mapping from table column index to semantic role, inferred per table and
/// discarded after that table is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub date: usize,
    pub description: Option<usize>,
    pub amount: usize,
}

/// Statement extraction pipeline.
///
/// Each page runs two independent strategies — table-column inference and
/// free-text line grouping — and their outputs are concatenated. The same
/// real-world transaction can therefore be emitted twice per page; see
/// [`ExtractConfig::dedupe_page_strategies`].
pub struct StatementExtractor {
    config: ExtractConfig,
}

impl StatementExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Extract transactions from all pages, in page order. Pages are
    /// independent; callers may instead map [`extract_page`](Self::extract_page)
    /// over pages in parallel and concatenate in order.
    pub fn extract(&self, pages: &[Page]) -> Vec<BankTransaction> {
        let mut transactions = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let found = self.extract_page(page);
            if found.is_empty() {
                debug!(page = index + 1, "page yielded no transactions");
            }
            transactions.extend(found);
        }
        transactions
    }

    /// Extract transactions from a single page. Never fails: a malformed
    /// page is a zero-contribution page.
    pub fn extract_page(&self, page: &Page) -> Vec<BankTransaction> {
        let mut transactions = Vec::new();

        for table in &page.tables {
            transactions.extend(self.process_table(table));
        }
        if let Some(text) = &page.text {
            transactions.extend(self.process_text(text));
        }

        if self.config.dedupe_page_strategies {
            dedupe(transactions)
        } else {
            transactions
        }
    }

    fn process_table(&self, table: &Table) -> Vec<BankTransaction> {
        if table.is_empty() || table.iter().all(|row| row.iter().all(|c| c.trim().is_empty())) {
            return Vec::new();
        }

        let Some(roles) = self.infer_columns(table) else {
            debug!("skipping table with unresolved date or amount column");
            return Vec::new();
        };

        let needed = roles
            .date
            .max(roles.amount)
            .max(roles.description.unwrap_or(0));

        let mut transactions = Vec::new();
        // Row 0 is always treated as the header, real or presumed.
        for row in table.iter().skip(1) {
            if row.len() <= needed {
                continue;
            }

            let Some(date) = find_date_ordered(&row[roles.date], self.config.date_order) else {
                continue;
            };
            let Some(raw_amount) = find_all_amounts(&row[roles.amount]).pop() else {
                continue;
            };

            let description = roles
                .description
                .map(|c| row[c].trim().to_string())
                .unwrap_or_default();
            let raw_text = row
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            transactions.push(build_transaction(date, description, raw_amount, raw_text));
        }

        transactions
    }

    /// Infer column roles from header synonyms, then content-sniff the first
    /// two data rows for any role the header did not resolve. Returns `None`
    /// when no date or amount column can be found.
    fn infer_columns(&self, table: &Table) -> Option<ColumnRoles> {
        let header: Vec<String> = table[0].iter().map(|c| c.trim().to_lowercase()).collect();

        let mut date_col = find_header_column(&header, DATE_HEADER_SYNONYMS);
        let mut desc_col = find_header_column(&header, DESCRIPTION_HEADER_SYNONYMS);
        let mut amount_col = find_header_column(&header, AMOUNT_HEADER_SYNONYMS);

        if date_col.is_none() || desc_col.is_none() || amount_col.is_none() {
            for row in table.iter().skip(1).take(2) {
                for (index, cell) in row.iter().enumerate() {
                    if date_col.is_none() && find_date(cell).is_some() {
                        date_col = Some(index);
                    }
                    if amount_col.is_none() && !find_all_amounts(cell).is_empty() {
                        amount_col = Some(index);
                    }
                }
            }

            if desc_col.is_none() {
                if let (Some(date), Some(amount)) = (date_col, amount_col) {
                    // First column strictly between the two.
                    let low = date.min(amount);
                    let high = date.max(amount);
                    desc_col = (low + 1..high).next();
                }
            }
        }

        match (date_col, amount_col) {
            (Some(date), Some(amount)) => Some(ColumnRoles {
                date,
                description: desc_col,
                amount,
            }),
            _ => None,
        }
    }

    fn process_text(&self, text: &str) -> Vec<BankTransaction> {
        let lines: Vec<&str> = text.lines().collect();
        let mut transactions = Vec::new();

        for group in group_lines(&lines) {
            let joined = group.join(" ");

            let Some(date) = find_date_ordered(&joined, self.config.date_order) else {
                continue;
            };
            let amounts = find_all_amounts(&joined);
            let Some(&raw_amount) = amounts.last() else {
                continue;
            };

            let description = clean_description(&joined, &amounts);
            if description.is_empty() {
                continue;
            }

            transactions.push(build_transaction(date, description, raw_amount, joined));
        }

        transactions
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn build_transaction(
    date: NaiveDateTime,
    description: String,
    raw_amount: Decimal,
    raw_text: String,
) -> BankTransaction {
    let (amount, transaction_type) = Money::from_signed(raw_amount);
    BankTransaction {
        date,
        description,
        amount,
        transaction_type,
        category: None,
        raw_text,
    }
}

/// Header synonym search: synonyms in priority order, first containing cell
/// wins.
fn find_header_column(header: &[String], synonyms: &[&str]) -> Option<usize> {
    for synonym in synonyms {
        for (index, cell) in header.iter().enumerate() {
            if cell.contains(synonym) {
                return Some(index);
            }
        }
    }
    None
}

/// Strip every date match and every rendering of every found amount out of
/// the joined group text, leaving the transaction description.
fn clean_description(text: &str, amounts: &[Decimal]) -> String {
    let mut cleaned = text.to_string();

    for pattern in DATE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    for amount in amounts {
        let plain = format_amount(*amount);
        let grouped = format_amount_grouped(*amount);
        // Longer and signed renderings first so substrings don't survive.
        for magnitude in [grouped, plain] {
            for rendered in [
                format!("-${magnitude}"),
                format!("${magnitude}"),
                format!("-{magnitude}"),
                magnitude.clone(),
            ] {
                cleaned = cleaned.replace(&rendered, "");
            }
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
        .to_string()
}

/// Drop repeats of (date, amount, direction) keeping the first occurrence.
fn dedupe(transactions: Vec<BankTransaction>) -> Vec<BankTransaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|t| seen.insert((t.date, t.amount, t.transaction_type)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DateOrder;
    use crate::models::statement::TransactionType;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_roles_resolve() {
        let t = table(&[&["Date", "Details", "Debit"]]);
        let roles = StatementExtractor::new().infer_columns(&t).unwrap();
        assert_eq!(
            roles,
            ColumnRoles { date: 0, description: Some(1), amount: 2 }
        );
    }

    #[test]
    fn content_sniffing_resolves_headerless_table() {
        let t = table(&[
            &["", "", ""],
            &["1/2/2024", "Coffee Shop", "-4.50"],
        ]);
        let roles = StatementExtractor::new().infer_columns(&t).unwrap();
        assert_eq!(
            roles,
            ColumnRoles { date: 0, description: Some(1), amount: 2 }
        );
    }

    #[test]
    fn unresolvable_table_is_skipped() {
        let t = table(&[
            &["one", "two"],
            &["no dates", "no amounts"],
        ]);
        let extractor = StatementExtractor::new();
        assert!(extractor.infer_columns(&t).is_none());
        assert!(extractor.process_table(&t).is_empty());
    }

    #[test]
    fn table_rows_become_transactions() {
        let t = table(&[
            &["Date", "Description", "Amount"],
            &["01/15/2024", "STARBUCKS #4421", "-6.75"],
            &["01/16/2024", "PAYROLL DEPOSIT", "1,250.00"],
            &["not a date", "JUNK ROW", "9.99"],
            &["01/17/2024", "NO AMOUNT HERE", "pending"],
        ]);
        let page = Page::from_tables(vec![t]);
        let transactions = StatementExtractor::new().extract_page(&page);

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].date, ymd(2024, 1, 15));
        assert_eq!(transactions[0].description, "STARBUCKS #4421");
        assert_eq!(transactions[0].amount, Money::parse("6.75").unwrap());
        assert_eq!(transactions[0].transaction_type, TransactionType::Debit);
        assert_eq!(transactions[1].amount, Money::parse("1250.00").unwrap());
        assert_eq!(transactions[1].transaction_type, TransactionType::Credit);
    }

    #[test]
    fn free_text_groups_become_transactions() {
        let text = "ACCOUNT ACTIVITY\n01/15/2024 POS DEBIT CARD PURCHASE\nSTARBUCKS #4421 -$6.75\n";
        let page = Page::from_text(text);
        let transactions = StatementExtractor::new().extract_page(&page);

        assert_eq!(transactions.len(), 1);
        let t = &transactions[0];
        assert_eq!(t.date, ymd(2024, 1, 15));
        assert!(t.description.contains("STARBUCKS"));
        assert!(!t.description.contains("6.75"));
        assert!(!t.description.contains("01/15/2024"));
        assert_eq!(t.amount, Money::parse("6.75").unwrap());
        assert_eq!(t.transaction_type, TransactionType::Debit);
    }

    #[test]
    fn last_amount_is_the_transaction_amount() {
        let text = "01/15/2024 TRANSFER FROM CHECKING 1234 balance $500.00 -$25.00";
        let transactions = StatementExtractor::new().extract_page(&Page::from_text(text));
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Money::parse("25.00").unwrap());
        assert_eq!(transactions[0].transaction_type, TransactionType::Debit);
    }

    #[test]
    fn both_strategies_run_and_may_duplicate() {
        let t = table(&[
            &["Date", "Description", "Amount"],
            &["01/15/2024", "COFFEE", "-4.50"],
        ]);
        let page = Page {
            tables: vec![t],
            text: Some("01/15/2024 COFFEE POS -$4.50".to_string()),
        };

        let transactions = StatementExtractor::new().extract_page(&page);
        assert_eq!(transactions.len(), 2);

        let config = ExtractConfig {
            dedupe_page_strategies: true,
            ..ExtractConfig::default()
        };
        let deduped = StatementExtractor::with_config(config).extract_page(&page);
        assert_eq!(deduped.len(), 1);
    }

    #[test]
    fn pages_concatenate_in_order() {
        let pages = vec![
            Page::from_text("01/15/2024 POS COFFEE -$4.50"),
            Page::from_text("no transactions on this page"),
            Page::from_text("01/16/2024 DEPOSIT $100.00"),
        ];
        let transactions = StatementExtractor::new().extract(&pages);
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].date, ymd(2024, 1, 15));
        assert_eq!(transactions[1].date, ymd(2024, 1, 16));
    }

    #[test]
    fn day_first_config_changes_table_dates() {
        let t = table(&[
            &["Date", "Details", "Amount"],
            &["03/04/2024", "COFFEE", "-4.50"],
        ]);
        let page = Page::from_tables(vec![t]);

        let month_first = StatementExtractor::new().extract_page(&page);
        assert_eq!(month_first[0].date, ymd(2024, 3, 4));

        let config = ExtractConfig {
            date_order: DateOrder::DayFirst,
            ..ExtractConfig::default()
        };
        let day_first = StatementExtractor::with_config(config).extract_page(&page);
        assert_eq!(day_first[0].date, ymd(2024, 4, 3));
    }

    #[test]
    fn empty_description_drops_group() {
        // Nothing but the date and the amount: stripping leaves an empty
        // description.
        let transactions =
            StatementExtractor::new().extract_page(&Page::from_text("01/15/2024 $4.50"));
        assert!(transactions.is_empty());
    }

    #[test]
    fn malformed_pages_contribute_nothing() {
        let pages = vec![
            Page::default(),
            Page::from_tables(vec![Vec::new(), table(&[&["", ""]])]),
            Page::from_text(""),
        ];
        assert!(StatementExtractor::new().extract(&pages).is_empty());
    }
}
