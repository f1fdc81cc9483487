//! Receipt normalization: from expense-extraction fields to a [`Receipt`].

mod assembler;
mod items;
pub mod rules;

pub use assembler::ReceiptAssembler;
pub use items::{
    ExtractionStrategy, FieldPolicy, ItemField, LineItemBuilder, ITEM_FIELD_POLICIES, PRICE_POLICY,
    QUANTITY_POLICY, UNIT_PRICE_POLICY,
};

use crate::error::ReceiptError;
use crate::models::expense::ExpenseDocument;
use crate::models::receipt::Receipt;

/// Result type for receipt assembly.
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Trait for receipt normalizers.
pub trait ReceiptNormalizer {
    /// Assemble a receipt from an expense document.
    fn assemble(&self, document: &ExpenseDocument) -> Result<Receipt>;

    /// Assemble a receipt from canonical or Textract JSON.
    fn assemble_json(&self, json: &str) -> crate::Result<Receipt> {
        let document = ExpenseDocument::from_json(json)?;
        Ok(self.assemble(&document)?)
    }
}
