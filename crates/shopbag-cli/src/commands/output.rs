//! Receipt rendering shared by `process` and `batch`.

use shopbag_core::Receipt;
use shopbag_core::models::config::OutputFormat as ConfigFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text summary
    Text,
}

impl From<ConfigFormat> for OutputFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Json => OutputFormat::Json,
            ConfigFormat::Csv => OutputFormat::Csv,
            ConfigFormat::Text => OutputFormat::Text,
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_receipt(
    receipt: &Receipt,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Json => Ok(serde_json::to_string(receipt)?),
        OutputFormat::Csv => format_receipt_csv(receipt),
        OutputFormat::Text => Ok(format_receipt_text(receipt)),
    }
}

fn format_receipt_csv(receipt: &Receipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "merchant",
        "date",
        "total",
        "currency",
        "item_index",
        "name",
        "quantity",
        "price",
        "unit_price",
    ])?;

    let date = receipt.date.to_string();
    let total = receipt.total.to_string();

    // A receipt without items still gets its header row.
    if receipt.items.is_empty() {
        wtr.write_record([
            receipt.merchant.as_str(),
            &date,
            &total,
            &receipt.currency,
            "",
            "",
            "",
            "",
            "",
        ])?;
    }

    for (index, item) in receipt.items.iter().enumerate() {
        wtr.write_record([
            receipt.merchant.as_str(),
            &date,
            &total,
            &receipt.currency,
            &index.to_string(),
            &item.name,
            &item.quantity.to_string(),
            &item.price.to_string(),
            &item.unit_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_receipt_text(receipt: &Receipt) -> String {
    let mut output = String::new();

    output.push_str(&format!("Merchant: {}\n", receipt.merchant));
    output.push_str(&format!("Date:     {}\n", receipt.date));
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", receipt.items.len()));
    for item in &receipt.items {
        let name = if item.name.is_empty() { "(unnamed)" } else { &item.name };
        if item.unit_price.is_zero() {
            output.push_str(&format!("  {} x {} = {}\n", item.quantity, name, item.price));
        } else {
            output.push_str(&format!(
                "  {} x {} @ {} = {}\n",
                item.quantity, name, item.unit_price, item.price
            ));
        }
    }
    output.push('\n');

    output.push_str(&format!("Total:    {} {}\n", receipt.total, receipt.currency));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shopbag_core::ReceiptItem;

    fn receipt() -> Receipt {
        Receipt {
            merchant: "MART".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            total: Decimal::new(2350, 2),
            currency: "EUR".to_string(),
            items: vec![
                ReceiptItem {
                    name: "Bread".to_string(),
                    quantity: Decimal::from(2),
                    price: Decimal::new(400, 2),
                    unit_price: Decimal::new(200, 2),
                },
                ReceiptItem {
                    name: String::new(),
                    quantity: Decimal::ONE,
                    price: Decimal::new(1950, 2),
                    unit_price: Decimal::ZERO,
                },
            ],
        }
    }

    #[test]
    fn test_csv_one_row_per_item() {
        let csv = format_receipt(&receipt(), OutputFormat::Csv, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "MART,2024-06-15,23.50,EUR,0,Bread,2,4.00,2.00");
        assert_eq!(lines[2], "MART,2024-06-15,23.50,EUR,1,,1,19.50,0");
    }

    #[test]
    fn test_csv_without_items() {
        let mut receipt = receipt();
        receipt.items.clear();

        let csv = format_receipt(&receipt, OutputFormat::Csv, false).unwrap();
        assert_eq!(csv.lines().nth(1), Some("MART,2024-06-15,23.50,EUR,,,,,"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_receipt(&receipt(), OutputFormat::Text, false).unwrap();

        assert!(text.contains("Merchant: MART"));
        assert!(text.contains("2 x Bread @ 2.00 = 4.00"));
        assert!(text.contains("1 x (unnamed) = 19.50"));
        assert!(text.contains("Total:    23.50 EUR"));
    }

    #[test]
    fn test_json_pretty() {
        let compact = format_receipt(&receipt(), OutputFormat::Json, false).unwrap();
        let pretty = format_receipt(&receipt(), OutputFormat::Json, true).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains("\n  \"merchant\": \"MART\""));
    }
}
