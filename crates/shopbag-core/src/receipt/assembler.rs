//! Receipt assembly over a full expense document.

use rust_decimal::Decimal;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::ReceiptError;
use crate::models::config::ExtractionConfig;
use crate::models::expense::{labels, ExpenseDocument, RawField};
use crate::models::receipt::Receipt;

use super::items::LineItemBuilder;
use super::rules::{extract_amount, find, find_currency, DateNormalizer};
use super::{ReceiptNormalizer, Result};

/// Assembles [`Receipt`]s from expense documents.
///
/// Holds only immutable settings, so one instance can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ReceiptAssembler {
    dates: DateNormalizer,
    items: LineItemBuilder,
}

impl ReceiptAssembler {
    /// Create an assembler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_two_digit_year_pivot(config.two_digit_year_pivot)
    }

    /// Set the two-digit-year pivot used for `dd.mm.yy` dates.
    pub fn with_two_digit_year_pivot(mut self, pivot: u8) -> Self {
        self.dates = self.dates.with_pivot(pivot);
        self
    }

    /// Two-digit-year pivot in effect for `dd.mm.yy` dates.
    pub fn two_digit_year_pivot(&self) -> u8 {
        self.dates.pivot()
    }

    // The header block comes first; its first line is the store name.
    fn merchant(&self, summary: &[RawField]) -> Result<String> {
        let header = summary.first().ok_or(ReceiptError::MissingMerchant)?;
        Ok(header.text.lines().next().unwrap_or("").to_string())
    }

    fn date(&self, summary: &[RawField]) -> Result<NaiveDate> {
        Ok(self.dates.normalize(find(summary, labels::INVOICE_RECEIPT_DATE))?)
    }

    fn total(&self, summary: &[RawField]) -> Result<Decimal> {
        let text = find(summary, labels::TOTAL);
        extract_amount(text).map_err(|e| ReceiptError::Total {
            raw_value: e.raw_value,
        })
    }

    fn build(&self, document: &ExpenseDocument) -> Result<Receipt> {
        let summary = &document.summary_fields;

        let merchant = self.merchant(summary)?;
        let date = self.date(summary)?;
        let total = self.total(summary)?;
        let currency = find_currency(summary).to_string();

        let items = document
            .line_item_groups
            .iter()
            .enumerate()
            .map(|(index, fields)| self.items.build(fields, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Receipt {
            merchant,
            date,
            total,
            currency,
            items,
        })
    }
}

impl ReceiptNormalizer for ReceiptAssembler {
    fn assemble(&self, document: &ExpenseDocument) -> Result<Receipt> {
        debug!(
            "Assembling receipt from {} summary fields and {} line items",
            document.summary_fields.len(),
            document.item_count()
        );

        match self.build(document) {
            Ok(receipt) => {
                info!(
                    merchant = %receipt.merchant,
                    date = %receipt.date,
                    total = %receipt.total,
                    items = receipt.items.len(),
                    "Assembled receipt"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(
                    field = %e.field(),
                    item_index = ?e.item_index(),
                    raw_value = e.raw_value(),
                    "error parsing receipt: {}",
                    e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DateLayout, DateParseError, FieldKind};
    use crate::models::receipt::ReceiptItem;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn mart_document() -> ExpenseDocument {
        ExpenseDocument::new(
            vec![
                RawField::new("VENDOR_NAME", "MART\nBranch 3"),
                RawField::new("INVOICE_RECEIPT_DATE", "15/06/2024"),
                RawField::new("TOTAL", "23,50").with_currency("EUR"),
            ],
            vec![vec![
                RawField::new("ITEM", "Bread"),
                RawField::new("QUANTITY", "2"),
                RawField::new("PRICE", "4,00"),
                RawField::new("UNIT_PRICE", "2,00"),
            ]],
        )
    }

    #[test]
    fn test_assemble_mart_receipt() {
        let receipt = ReceiptAssembler::new().assemble(&mart_document()).unwrap();

        assert_eq!(
            receipt,
            Receipt {
                merchant: "MART".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                total: dec("23.50"),
                currency: "EUR".to_string(),
                items: vec![ReceiptItem {
                    name: "Bread".to_string(),
                    quantity: Decimal::from(2),
                    price: dec("4.00"),
                    unit_price: dec("2.00"),
                }],
            }
        );
    }

    #[test]
    fn test_assemble_is_repeatable() {
        let assembler = ReceiptAssembler::new();
        let document = mart_document();
        assert_eq!(assembler.assemble(&document), assembler.assemble(&document));

        let mut broken = mart_document();
        broken.line_item_groups[0][2].text.clear();
        assert_eq!(assembler.assemble(&broken), assembler.assemble(&broken));
    }

    #[test]
    fn test_merchant_is_first_summary_field() {
        let mut document = mart_document();
        document.summary_fields.rotate_left(1);

        // The date field now comes first and becomes the merchant.
        let receipt = ReceiptAssembler::new().assemble(&document).unwrap();
        assert_eq!(receipt.merchant, "15/06/2024");
    }

    #[test]
    fn test_merchant_from_crlf_and_empty_header() {
        let mut document = mart_document();
        document.summary_fields[0].text = "MART\r\nBranch 3".to_string();
        assert_eq!(ReceiptAssembler::new().assemble(&document).unwrap().merchant, "MART");

        document.summary_fields[0].text.clear();
        assert_eq!(ReceiptAssembler::new().assemble(&document).unwrap().merchant, "");
    }

    #[test]
    fn test_no_summary_fields() {
        let document = ExpenseDocument::new(Vec::new(), Vec::new());
        assert_eq!(
            ReceiptAssembler::new().assemble(&document),
            Err(ReceiptError::MissingMerchant)
        );
    }

    #[test]
    fn test_missing_currency_is_empty() {
        let mut document = mart_document();
        document.summary_fields[2].currency_code = None;
        assert_eq!(ReceiptAssembler::new().assemble(&document).unwrap().currency, "");
    }

    #[test]
    fn test_bad_date_aborts() {
        let mut document = mart_document();
        document.summary_fields[1].text = "31.02.24".to_string();

        assert_eq!(
            ReceiptAssembler::new().assemble(&document),
            Err(ReceiptError::Date(DateParseError::OutOfRange {
                raw_value: "31.02.24".to_string(),
                layout: DateLayout::DottedShortYear,
            }))
        );
    }

    #[test]
    fn test_missing_date_aborts() {
        let mut document = mart_document();
        document.summary_fields.remove(1);

        let err = ReceiptAssembler::new().assemble(&document).unwrap_err();
        assert_eq!(err.field(), FieldKind::Date);
    }

    #[test]
    fn test_bad_total_aborts() {
        let mut document = mart_document();
        document.summary_fields[2].text = "EUR".to_string();

        assert_eq!(
            ReceiptAssembler::new().assemble(&document),
            Err(ReceiptError::Total {
                raw_value: "EUR".to_string()
            })
        );
    }

    #[test]
    fn test_item_failure_aborts_with_index() {
        let mut document = mart_document();
        let mut second = document.line_item_groups[0].clone();
        second[2].text = String::new();
        document.line_item_groups.push(second);

        assert_eq!(
            ReceiptAssembler::new().assemble(&document),
            Err(ReceiptError::PriceMissing { item_index: 1 })
        );
    }

    #[test]
    fn test_items_keep_document_order() {
        let mut document = mart_document();
        for name in ["Milk", "Apples", "Butter"] {
            document.line_item_groups.push(vec![
                RawField::new("ITEM", name),
                RawField::new("PRICE", "1,00"),
            ]);
        }

        let receipt = ReceiptAssembler::new().assemble(&document).unwrap();
        let names: Vec<&str> = receipt.items.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(receipt.items.len(), document.line_item_groups.len());
        assert_eq!(names, ["Bread", "Milk", "Apples", "Butter"]);
    }

    #[test]
    fn test_pivot_from_config() {
        let mut document = mart_document();
        document.summary_fields[1].text = "15.06.60".to_string();

        let default = ReceiptAssembler::new().assemble(&document).unwrap();
        assert_eq!(default.date, NaiveDate::from_ymd_opt(2060, 6, 15).unwrap());

        let config = ExtractionConfig {
            two_digit_year_pivot: 50,
        };
        let assembler = ReceiptAssembler::from_config(&config);
        assert_eq!(assembler.two_digit_year_pivot(), 50);
        let configured = assembler.assemble(&document).unwrap();
        assert_eq!(configured.date, NaiveDate::from_ymd_opt(1960, 6, 15).unwrap());

        assert_eq!(ReceiptAssembler::new().two_digit_year_pivot(), 69);
        assert_eq!(
            ReceiptAssembler::new().with_two_digit_year_pivot(200).two_digit_year_pivot(),
            100
        );
    }

    #[test]
    fn test_assemble_json() {
        let json = r#"{
            "summaryFields": [
                {"label": "VENDOR_NAME", "text": "MART"},
                {"label": "INVOICE_RECEIPT_DATE", "text": "01-02-2023"},
                {"label": "TOTAL", "text": "EUR 4.00"}
            ],
            "lineItemGroups": [[{"label": "PRICE", "text": "4.00"}]]
        }"#;

        let receipt = ReceiptAssembler::new().assemble_json(json).unwrap();
        assert_eq!(receipt.total, dec("4.00"));
        assert_eq!(receipt.items[0].quantity, Decimal::ONE);
    }

    #[test]
    fn test_assembler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReceiptAssembler>();
    }
}
