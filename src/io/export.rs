use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{Amount, Entry, Ledger, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to reproduce a receipt on paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSnapshot {
    pub version: String,
    pub entries: Vec<Entry>,
    pub service_rate: Amount,
    pub totals: Totals,
}

impl ReceiptSnapshot {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            entries: ledger.entries().to_vec(),
            service_rate: ledger.service_rate(),
            totals: ledger.totals(),
        }
    }
}

/// Exporter for writing a ledger out in various formats
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export in the given format, returning the number of entries written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Csv => self.export_entries_csv(writer),
            ExportFormat::Json => Ok(self.export_json(writer)?.entries.len()),
        }
    }

    /// Export entries to CSV, in insertion order
    pub fn export_entries_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "kind", "price", "quantity", "value"])?;

        let mut count = 0;
        for entry in self.ledger.entries() {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.kind.as_str().to_string(),
                entry.price.to_string(),
                entry.quantity.to_string(),
                entry.value.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export entries, service rate and totals as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<ReceiptSnapshot> {
        let snapshot = ReceiptSnapshot::from_ledger(self.ledger);

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
