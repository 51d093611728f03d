//! Configuration for the extraction pipelines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BillfoldError, Result};

/// Convention for resolving ambiguous numeric dates like `03/04/2024`.
///
/// The default tries `MM/DD/YYYY` before `DD/MM/YYYY`, which mis-parses
/// day-first documents whose day happens to be 12 or less. This is a
/// documented trade-off, not something the extractors second-guess; set
/// [`DayFirst`](DateOrder::DayFirst) for documents from day-first locales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

/// Immutable settings shared by the receipt and statement extractors.
/// Constructed once and passed by reference into each extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Resolution order for ambiguous numeric dates.
    pub date_order: DateOrder,

    /// Suppress duplicates when the table strategy and the free-text
    /// strategy of a statement page both emit the same transaction. Off by
    /// default: the same real-world transaction may be emitted twice.
    pub dedupe_page_strategies: bool,

    /// Maximum length for a line to qualify as a store name.
    pub store_name_max_len: usize,

    /// How many leading receipt lines are scanned for the store name.
    pub store_name_scan_lines: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::MonthFirst,
            dedupe_page_strategies: false,
            store_name_max_len: 30,
            store_name_scan_lines: 3,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| BillfoldError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.date_order, DateOrder::MonthFirst);
        assert!(!config.dedupe_page_strategies);
        assert_eq!(config.store_name_max_len, 30);
        assert_eq!(config.store_name_scan_lines, 3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ExtractConfig =
            serde_json::from_str(r#"{"date_order": "day_first"}"#).unwrap();
        assert_eq!(config.date_order, DateOrder::DayFirst);
        assert_eq!(config.store_name_max_len, 30);
    }
}
