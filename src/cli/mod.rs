use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};

use crate::application::ReceiptService;
use crate::domain::{Amount, EntryKind, to_number};
use crate::io::{ExportFormat, Exporter, ReceiptSnapshot};

mod render;
mod shell;

pub use render::*;
pub use shell::*;

/// Tally - bill and receipt calculator
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Add up a bill line by line, apply a service percentage, get the total")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for totals: text, json
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session
    Shell {
        /// Do not ask for confirmation before clearing
        #[arg(short, long)]
        yes: bool,
    },

    /// Compute a receipt from items given on the command line
    Calc {
        /// Items: PRICExQTY (or PRICE*QTY) to multiply, PRICE/QTY to divide
        #[arg(required = true)]
        items: Vec<String>,

        /// Service percentage (0-100)
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Export a receipt to CSV or JSON
    Export {
        /// Format: csv, json
        export_type: String,

        /// Items: PRICExQTY (or PRICE*QTY) to multiply, PRICE/QTY to divide
        #[arg(required = true)]
        items: Vec<String>,

        /// Service percentage (0-100)
        #[arg(short, long)]
        service: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// One `PRICExQTY` / `PRICE/QTY` item from the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    pub kind: EntryKind,
    pub price: Amount,
    pub quantity: Amount,
}

/// Parse a line item such as `100x2`, `12.5*3` or `90/3`.
/// Returns `None` when there is no operator or an operand is missing.
/// Operands themselves are coerced leniently, see [`parse_amount`].
pub fn parse_item(input: &str) -> Option<LineItem> {
    let input = input.trim();
    let (kind, (price, quantity)) = if let Some(parts) = input.split_once('/') {
        (EntryKind::Quotient, parts)
    } else if let Some(parts) = input.split_once('*') {
        (EntryKind::Product, parts)
    } else {
        // Split on the last `x` so a hex price such as `0x10x2` still works.
        (EntryKind::Product, input.rsplit_once(['x', 'X'])?)
    };

    if price.trim().is_empty() || quantity.trim().is_empty() {
        return None;
    }

    Some(LineItem {
        kind,
        price: parse_amount(price),
        quantity: parse_amount(quantity),
    })
}

/// Coerce user text to a number, accepting a decimal comma (`12,5`).
pub fn parse_amount(input: &str) -> Amount {
    to_number(&input.replace(',', "."))
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let format = OutputFormat::from_str(&self.format).with_context(|| {
            format!("Unknown output format '{}'. Use 'text' or 'json'", self.format)
        })?;

        match self.command {
            Commands::Shell { yes } => {
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                let mut session = Session::new(stdin.lock(), io::stdout().lock())
                    .assume_yes(yes)
                    .with_format(format)
                    .with_prompt(interactive);
                session.run()?;
            }

            Commands::Calc { items, service } => {
                let receipt = build_receipt(&items, service.as_deref())?;
                let mut out = io::stdout().lock();
                match format {
                    OutputFormat::Text => {
                        write_history(&mut out, &receipt)?;
                        writeln!(out)?;
                        write_totals(&mut out, &receipt.totals(), receipt.service_rate())?;
                    }
                    OutputFormat::Json => {
                        let snapshot = ReceiptSnapshot::from_ledger(receipt.ledger());
                        serde_json::to_writer_pretty(&mut out, &snapshot)?;
                        writeln!(out)?;
                    }
                }
            }

            Commands::Export {
                export_type,
                items,
                service,
                output,
            } => {
                let export_format = ExportFormat::from_str(&export_type).with_context(|| {
                    format!("Unknown export format '{}'. Use 'csv' or 'json'", export_type)
                })?;
                let receipt = build_receipt(&items, service.as_deref())?;
                let exporter = Exporter::new(receipt.ledger());

                match output {
                    Some(path) => {
                        let file = File::create(&path)
                            .with_context(|| format!("Failed to create file: {}", path))?;
                        let count = exporter.export(export_format, BufWriter::new(file))?;
                        eprintln!("Exported {} entries to {}", count, path);
                    }
                    None => {
                        exporter.export(export_format, io::stdout().lock())?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn build_receipt(items: &[String], service_rate: Option<&str>) -> Result<ReceiptService> {
    let mut receipt = ReceiptService::new();

    for raw in items {
        let item = parse_item(raw).with_context(|| {
            format!("Invalid item '{}'. Use PRICExQTY or PRICE/QTY", raw)
        })?;
        receipt
            .add_entry(item.kind, item.price, item.quantity)
            .with_context(|| format!("Cannot add item '{}'", raw))?;
    }

    if let Some(rate) = service_rate {
        receipt
            .apply_service(parse_amount(rate))
            .context("Invalid service percentage")?;
    }

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_product() {
        assert_eq!(
            parse_item("100x2"),
            Some(LineItem {
                kind: EntryKind::Product,
                price: 100.0,
                quantity: 2.0
            })
        );
        assert_eq!(parse_item("12.5*4").map(|i| i.price), Some(12.5));
        assert_eq!(parse_item("3X3").map(|i| i.kind), Some(EntryKind::Product));
    }

    #[test]
    fn test_parse_item_quotient() {
        let item = parse_item("90/3").unwrap();
        assert_eq!(item.kind, EntryKind::Quotient);
        assert_eq!(item.price, 90.0);
        assert_eq!(item.quantity, 3.0);
    }

    #[test]
    fn test_parse_item_hex_price() {
        let item = parse_item("0x10x2").unwrap();
        assert_eq!(item.price, 16.0);
        assert_eq!(item.quantity, 2.0);
    }

    #[test]
    fn test_parse_item_rejects_missing_parts() {
        assert_eq!(parse_item("100"), None);
        assert_eq!(parse_item("x2"), None);
        assert_eq!(parse_item("100/"), None);
    }

    #[test]
    fn test_parse_item_garbage_operand_is_nan() {
        let item = parse_item("abc/2").unwrap();
        assert!(item.price.is_nan());
    }

    #[test]
    fn test_parse_amount_accepts_decimal_comma() {
        assert_eq!(parse_amount("12,5"), 12.5);
        assert_eq!(parse_amount(" 7 "), 7.0);
    }

    #[test]
    fn test_build_receipt() {
        let items = vec!["100x2".to_string(), "90/3".to_string()];
        let receipt = build_receipt(&items, Some("10")).unwrap();

        assert_eq!(receipt.totals().total, 253.0);
    }

    #[test]
    fn test_build_receipt_rejects_bad_service() {
        let items = vec!["100x2".to_string()];
        assert!(build_receipt(&items, Some("150")).is_err());
        assert!(build_receipt(&items, Some("ten")).is_err());
    }

    #[test]
    fn test_build_receipt_rejects_zero_quantity() {
        let items = vec!["100/0".to_string()];
        assert!(build_receipt(&items, None).is_err());
    }
}
