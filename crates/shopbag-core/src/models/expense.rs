//! Labeled fields as returned by an expense-extraction service.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShopbagError};
use super::textract::AnalyzeExpenseResponse;

/// Well-known field labels.
pub mod labels {
    pub const INVOICE_RECEIPT_DATE: &str = "INVOICE_RECEIPT_DATE";
    pub const TOTAL: &str = "TOTAL";
    pub const ITEM: &str = "ITEM";
    pub const QUANTITY: &str = "QUANTITY";
    pub const PRICE: &str = "PRICE";
    pub const UNIT_PRICE: &str = "UNIT_PRICE";
}

/// One detected field: a semantic label and the text found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    /// Semantic label (e.g. `TOTAL`). Not unique within a collection.
    pub label: String,

    /// Detected text.
    #[serde(default)]
    pub text: String,

    /// ISO currency code attached by the extractor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

impl RawField {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            currency_code: None,
        }
    }

    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }
}

/// A scanned receipt as a set of summary fields plus one field group per line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDocument {
    /// Document-level fields (header block, date, total...).
    pub summary_fields: Vec<RawField>,

    /// Fields of each printed line, in receipt order.
    #[serde(default)]
    pub line_item_groups: Vec<Vec<RawField>>,
}

impl ExpenseDocument {
    pub fn new(summary_fields: Vec<RawField>, line_item_groups: Vec<Vec<RawField>>) -> Self {
        Self {
            summary_fields,
            line_item_groups,
        }
    }

    /// Parse either the canonical document JSON or a Textract `AnalyzeExpense` response.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        if value.get("ExpenseDocuments").is_some() {
            debug!("Reading input as Textract AnalyzeExpense response");
            let response: AnalyzeExpenseResponse = serde_json::from_value(value)?;
            return response.into_expense_document();
        }

        if value.get("summaryFields").is_none() {
            return Err(ShopbagError::Input(
                "expected an expense document (summaryFields) or a Textract response (ExpenseDocuments)"
                    .to_string(),
            ));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Number of line item groups.
    pub fn item_count(&self) -> usize {
        self.line_item_groups.len()
    }
}
