//! Statement command - extract transactions from a statement pages file.
//!
//! The input is the JSON handed over by the external PDF collaborator: an
//! ordered array of pages, each with optional `tables` (grids of string
//! cells) and optional `text`. Pages are independent, so they are mapped in
//! parallel and the per-page results concatenated in page order.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use tracing::info;

use billfold_core::{BankTransaction, Page, StatementExtractor};

use super::{load_config, write_output, OutputFormat};

/// Arguments for the statement command.
#[derive(Args)]
pub struct StatementArgs {
    /// Input JSON file of extracted pages
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: StatementArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read_to_string(&args.input)?;
    let pages: Vec<Page> = serde_json::from_str(&data)?;
    info!(pages = pages.len(), "Processing statement: {}", args.input.display());

    let extractor = Arc::new(StatementExtractor::with_config(config));

    // Parallel map over pages; awaiting in order keeps the output ordered by
    // page regardless of completion order.
    let mut handles = Vec::with_capacity(pages.len());
    for page in pages {
        let extractor = Arc::clone(&extractor);
        handles.push(tokio::task::spawn_blocking(move || {
            extractor.extract_page(&page)
        }));
    }

    let mut transactions = Vec::new();
    for handle in handles {
        transactions.extend(handle.await?);
    }

    let rendered = render(&transactions, args.format)?;
    write_output(args.output.as_ref(), &rendered)
}

fn render(transactions: &[BankTransaction], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["date", "description", "amount", "type"])?;
            for t in transactions {
                writer.write_record(&[
                    t.date.format("%Y-%m-%d").to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.transaction_type.as_str().to_string(),
                ])?;
            }
            let data = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("csv buffer error: {e}"))?;
            Ok(String::from_utf8(data)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!(
                "{} {} transactions\n",
                style("Extracted:").bold(),
                transactions.len()
            ));
            for t in transactions {
                out.push_str(&format!(
                    "  {}  {:>6}  ${}  {}\n",
                    t.date.format("%Y-%m-%d"),
                    t.transaction_type.as_str(),
                    t.amount,
                    t.description
                ));
            }
            Ok(out)
        }
    }
}
