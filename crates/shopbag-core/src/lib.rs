//! Core library for shopping receipt normalization.
//!
//! This crate provides:
//! - Input models for expense-extraction output (canonical and AWS Textract JSON)
//! - Recovery rules for noisy OCR text (amounts, dates, field lookup)
//! - Line item and receipt assembly with attributable errors
//! - The canonical `Receipt` model handed to persistence

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{
    AmountParseError, DateLayout, DateParseError, FieldKind, ReceiptError, Result, ShopbagError,
};
pub use models::config::ShopbagConfig;
pub use models::expense::{ExpenseDocument, RawField};
pub use models::receipt::{DuplicateKey, Receipt, ReceiptItem};
pub use receipt::{LineItemBuilder, ReceiptAssembler, ReceiptNormalizer};
