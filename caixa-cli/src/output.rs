//! Output formatting utilities

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a monetary value as "R$ 1234.56"
pub fn format_money(value: Decimal) -> String {
    format!("R$ {:.2}", value)
}

/// Parse a monetary amount typed by the user.
///
/// Accepts a comma as the decimal separator, so "100,50" and "100.50"
/// both parse. Validation of sign and range stays in the core.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<Decimal>()
        .map_err(|_| anyhow!("invalid amount: {}", raw))
}

/// Parse a date as dd/mm/yyyy, or yyyy-mm-dd as a fallback.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| anyhow!("invalid date: {} (expected dd/mm/yyyy)", raw))
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Print a reminder when a mutation succeeded in memory but could not be
/// flushed to disk.
pub fn persistence_warning(persisted: bool) {
    if !persisted {
        warning("Warning: changes could not be written to disk; they are held in memory only.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_comma() {
        assert_eq!(parse_amount("100,50").unwrap(), Decimal::new(10050, 2));
        assert_eq!(parse_amount("100.50").unwrap(), Decimal::new(10050, 2));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(parse_date("04/03/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-03-04").unwrap(), expected);
        assert!(parse_date("04-03-2024").is_err());
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(10050, 2)), "R$ 100.50");
        assert_eq!(format_money(Decimal::new(1000, 0)), "R$ 1000.00");
    }
}
