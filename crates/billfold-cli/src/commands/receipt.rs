//! Receipt command - extract structured data from a receipt text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use billfold_core::categorize::{apply_to_receipt, CategorizeRequest};
use billfold_core::{categorize_or_fallback, KeywordCategorizer, Receipt, ReceiptExtractor};

use super::{load_config, write_output, OutputFormat};

/// Arguments for the receipt command.
#[derive(Args)]
pub struct ReceiptArgs {
    /// Input text file (OCR output)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Categorize items with the keyword rule engine
    #[arg(long)]
    categorize: bool,
}

pub async fn run(args: ReceiptArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    info!("Processing receipt: {}", args.input.display());

    let extractor = ReceiptExtractor::with_config(config);
    let mut receipt = extractor.extract(&text);

    if args.categorize {
        let request = CategorizeRequest::from_receipt(&receipt);
        let classified = categorize_or_fallback(&KeywordCategorizer::new(), &request);
        receipt = apply_to_receipt(receipt, &classified);
    }

    let rendered = render(&receipt, args.format)?;
    write_output(args.output.as_ref(), &rendered)
}

fn render(receipt: &Receipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["description", "quantity", "price", "category"])?;
            for item in &receipt.items {
                writer.write_record(&[
                    item.description.clone(),
                    item.quantity.to_string(),
                    item.price.to_string(),
                    item.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
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
                "{} {}\n",
                style("Store:").bold(),
                receipt.store_name
            ));
            out.push_str(&format!(
                "{} {}\n",
                style("Date:").bold(),
                receipt.date.format("%Y-%m-%d")
            ));
            out.push_str(&format!("{}\n", style("Items:").bold()));
            for item in &receipt.items {
                out.push_str(&format!(
                    "  {} x{}  ${}\n",
                    item.description, item.quantity, item.price
                ));
            }
            out.push_str(&format!(
                "Subtotal: ${}\nTax: ${}\nTotal: ${}\n",
                receipt.subtotal, receipt.tax, receipt.total
            ));
            Ok(out)
        }
    }
}
