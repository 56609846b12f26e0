use std::io::{self, Write};

use crate::application::ReceiptService;
use crate::domain::{Amount, Totals, format_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Print entries most recent first, the way a receipt is read back.
pub fn write_history<W: Write>(out: &mut W, service: &ReceiptService) -> io::Result<()> {
    let history = service.history();
    if history.is_empty() {
        return writeln!(out, "History is empty");
    }

    writeln!(out, "{:<6} {:<2} {:>14}   {}", "ID", "", "VALUE", "DETAILS")?;
    writeln!(out, "{}", "-".repeat(48))?;
    for entry in history {
        writeln!(
            out,
            "#{:<5} {:<2} {:>14}   price {} • qty {}",
            entry.id,
            entry.kind.symbol(),
            format_amount(entry.value),
            format_amount(entry.price),
            entry.quantity
        )?;
    }
    Ok(())
}

pub fn write_totals<W: Write>(
    out: &mut W,
    totals: &Totals,
    service_rate: Amount,
) -> io::Result<()> {
    writeln!(out, "{:<10} {:>15}", "Sum:", format_amount(totals.sum))?;
    writeln!(
        out,
        "{:<10} {:>15}  ({}%)",
        "Service:",
        format_amount(totals.service_amount),
        format_amount(service_rate)
    )?;
    writeln!(out, "{}", "-".repeat(26))?;
    writeln!(out, "{:<10} {:>15}", "Total:", format_amount(totals.total))
}

/// Compact one-line summary printed after every change.
pub fn write_summary<W: Write>(out: &mut W, totals: &Totals) -> io::Result<()> {
    writeln!(
        out,
        "Sum {} · Service {} · Total {}",
        format_amount(totals.sum),
        format_amount(totals.service_amount),
        format_amount(totals.total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_history_empty() {
        let service = ReceiptService::new();
        let text = render(|out| write_history(out, &service));
        assert_eq!(text, "History is empty\n");
    }

    #[test]
    fn test_write_history_most_recent_first() {
        let mut service = ReceiptService::new();
        service.add_product(1500.0, 2.0).unwrap();
        service.add_quotient(10.0, 3.0).unwrap();

        let text = render(|out| write_history(out, &service));
        let rows: Vec<&str> = text.lines().skip(2).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("#2"));
        assert!(rows[0].contains("3,33"));
        assert!(rows[0].contains("price 10 • qty 3"));
        assert!(rows[1].starts_with("#1"));
        assert!(rows[1].contains("3 000"));
    }

    #[test]
    fn test_write_totals() {
        let totals = Totals {
            sum: 230.0,
            service_amount: 23.0,
            total: 253.0,
        };

        let text = render(|out| write_totals(out, &totals, 10.0));

        assert!(text.contains("Sum:"));
        assert!(text.contains("230"));
        assert!(text.contains("(10%)"));
        assert!(text.lines().last().unwrap().ends_with("253"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }
}
