//! AWS Textract `AnalyzeExpense` response shape.
//!
//! Only the members the receipt engine reads are modelled; everything else in
//! the response (geometry, group properties, blocks) is ignored on input.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopbagError};
use super::expense::{ExpenseDocument, RawField};

/// Top-level `AnalyzeExpense` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzeExpenseResponse {
    #[serde(default)]
    pub expense_documents: Vec<TextractExpenseDocument>,
}

/// One analyzed expense document (one receipt image).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextractExpenseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_index: Option<u32>,

    #[serde(default)]
    pub summary_fields: Vec<ExpenseField>,

    #[serde(default)]
    pub line_item_groups: Vec<LineItemGroup>,
}

/// A table of line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItemGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_item_group_index: Option<u32>,

    #[serde(default)]
    pub line_items: Vec<LineItemFields>,
}

/// Fields of a single line item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItemFields {
    #[serde(default)]
    pub line_item_expense_fields: Vec<ExpenseField>,
}

/// A detected expense field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpenseField {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<ExpenseDetection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_detection: Option<ExpenseDetection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_detection: Option<ExpenseDetection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<ExpenseCurrency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

/// Detected text with its confidence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpenseDetection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Currency annotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpenseCurrency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl From<&ExpenseField> for RawField {
    fn from(field: &ExpenseField) -> Self {
        let text_of = |d: &Option<ExpenseDetection>| {
            d.as_ref().and_then(|d| d.text.clone()).unwrap_or_default()
        };

        RawField {
            label: text_of(&field.field_type),
            text: text_of(&field.value_detection),
            currency_code: field.currency.as_ref().and_then(|c| c.code.clone()),
        }
    }
}

impl TextractExpenseDocument {
    /// Flatten into an [`ExpenseDocument`]; line items of every group are
    /// concatenated in document order.
    pub fn to_expense_document(&self) -> ExpenseDocument {
        let summary_fields: Vec<RawField> = self.summary_fields.iter().map(RawField::from).collect();
        let line_item_groups: Vec<Vec<RawField>> = self
            .line_item_groups
            .iter()
            .flat_map(|group| &group.line_items)
            .map(|item| item.line_item_expense_fields.iter().map(RawField::from).collect())
            .collect();

        ExpenseDocument::new(summary_fields, line_item_groups)
    }
}

impl AnalyzeExpenseResponse {
    /// Convert the first expense document of the response.
    pub fn into_expense_document(self) -> Result<ExpenseDocument> {
        self.expense_documents
            .first()
            .map(TextractExpenseDocument::to_expense_document)
            .ok_or_else(|| {
                ShopbagError::Input("Textract response contains no expense documents".to_string())
            })
    }
}
