//! Error types for the shopbag-core library.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the shopbag library.
#[derive(Error, Debug)]
pub enum ShopbagError {
    /// Receipt assembly failed on a specific field.
    #[error("could not analyze receipt: {0}")]
    Receipt(#[from] ReceiptError),

    /// Input document is not a recognised expense-extraction payload.
    #[error("invalid input: {0}")]
    Input(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Receipt field a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    Merchant,
    Date,
    Total,
    Quantity,
    Price,
    UnitPrice,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Merchant => "merchant",
            FieldKind::Date => "date",
            FieldKind::Total => "total",
            FieldKind::Quantity => "quantity",
            FieldKind::Price => "price",
            FieldKind::UnitPrice => "unit price",
        };
        f.write_str(name)
    }
}

/// Layout a date string was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLayout {
    /// `dd.mm.yy`
    DottedShortYear,
    /// `dd/mm/yyyy` (hyphens already folded into slashes).
    Slash,
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLayout::DottedShortYear => f.write_str("dd.mm.yy"),
            DateLayout::Slash => f.write_str("dd/mm/yyyy"),
        }
    }
}

/// No numeric token could be read from a text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no amount found in {raw_value:?}")]
pub struct AmountParseError {
    /// Text the token scan ran over.
    pub raw_value: String,
}

/// A date field could not be read under its selected layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Text does not have the shape of the selected layout.
    #[error("date {raw_value:?} does not match layout {layout}")]
    Layout { raw_value: String, layout: DateLayout },

    /// Text has the right shape but names no calendar day.
    #[error("date {raw_value:?} is out of range for layout {layout}")]
    OutOfRange { raw_value: String, layout: DateLayout },
}

impl DateParseError {
    /// The date text as it was handed to the normalizer.
    pub fn raw_value(&self) -> &str {
        match self {
            DateParseError::Layout { raw_value, .. } | DateParseError::OutOfRange { raw_value, .. } => {
                raw_value
            }
        }
    }

    /// Layout the discriminator selected.
    pub fn layout(&self) -> DateLayout {
        match self {
            DateParseError::Layout { layout, .. } | DateParseError::OutOfRange { layout, .. } => *layout,
        }
    }
}

/// Attributable failure of a receipt assembly.
///
/// Every variant is fatal to the assembly call it came from; no partially
/// built receipt is ever returned alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// The document has no summary fields to take the merchant name from.
    #[error("document has no summary fields, merchant name unavailable")]
    MissingMerchant,

    /// Receipt date could not be normalized.
    #[error(transparent)]
    Date(#[from] DateParseError),

    /// Receipt total carries no readable amount.
    #[error("no amount found in total {raw_value:?}")]
    Total { raw_value: String },

    /// Quantity was present but neither parsed directly nor by token scan.
    #[error("item #{item_index}: could not parse quantity {raw_value:?}")]
    Quantity { item_index: usize, raw_value: String },

    /// Price is mandatory and was empty.
    #[error("item #{item_index}: empty price")]
    PriceMissing { item_index: usize },

    /// Price was present but unreadable.
    #[error("item #{item_index}: could not parse price {raw_value:?}")]
    Price { item_index: usize, raw_value: String },

    /// Unit price was present but unreadable.
    #[error("item #{item_index}: could not parse unit price {raw_value:?}")]
    UnitPrice { item_index: usize, raw_value: String },
}

impl ReceiptError {
    /// Field the failure is attributed to.
    pub fn field(&self) -> FieldKind {
        match self {
            ReceiptError::MissingMerchant => FieldKind::Merchant,
            ReceiptError::Date(_) => FieldKind::Date,
            ReceiptError::Total { .. } => FieldKind::Total,
            ReceiptError::Quantity { .. } => FieldKind::Quantity,
            ReceiptError::PriceMissing { .. } | ReceiptError::Price { .. } => FieldKind::Price,
            ReceiptError::UnitPrice { .. } => FieldKind::UnitPrice,
        }
    }

    /// Zero-based line item index, for item-level failures.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            ReceiptError::Quantity { item_index, .. }
            | ReceiptError::PriceMissing { item_index }
            | ReceiptError::Price { item_index, .. }
            | ReceiptError::UnitPrice { item_index, .. } => Some(*item_index),
            _ => None,
        }
    }

    /// Offending raw text; empty when the field was absent.
    pub fn raw_value(&self) -> &str {
        match self {
            ReceiptError::MissingMerchant | ReceiptError::PriceMissing { .. } => "",
            ReceiptError::Date(e) => e.raw_value(),
            ReceiptError::Total { raw_value }
            | ReceiptError::Quantity { raw_value, .. }
            | ReceiptError::Price { raw_value, .. }
            | ReceiptError::UnitPrice { raw_value, .. } => raw_value,
        }
    }
}

/// Result type for the shopbag library.
pub type Result<T> = std::result::Result<T, ShopbagError>;
