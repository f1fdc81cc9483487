//! Line item building.
//!
//! Quantity, price and unit price look alike but each has its own rule for
//! absence and for how the number is read. The rules live in one table,
//! [`ITEM_FIELD_POLICIES`], instead of three hand-written branches.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::{FieldKind, ReceiptError};
use crate::models::expense::{labels, RawField};
use crate::models::receipt::ReceiptItem;
use super::rules::{extract_amount, find, parse_decimal};

/// Numeric line item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Quantity,
    Price,
    UnitPrice,
}

impl ItemField {
    pub fn kind(&self) -> FieldKind {
        match self {
            ItemField::Quantity => FieldKind::Quantity,
            ItemField::Price => FieldKind::Price,
            ItemField::UnitPrice => FieldKind::UnitPrice,
        }
    }

    fn missing(&self, item_index: usize) -> ReceiptError {
        match self {
            ItemField::Price => ReceiptError::PriceMissing { item_index },
            _ => self.unparsable(item_index, ""),
        }
    }

    fn unparsable(&self, item_index: usize, raw_value: &str) -> ReceiptError {
        let raw_value = raw_value.to_string();
        match self {
            ItemField::Quantity => ReceiptError::Quantity { item_index, raw_value },
            ItemField::Price => ReceiptError::Price { item_index, raw_value },
            ItemField::UnitPrice => ReceiptError::UnitPrice { item_index, raw_value },
        }
    }
}

/// How a present field's text is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The whole text must be a decimal.
    Direct,
    /// First `digits[,.]digits` token anywhere in the text.
    TokenScan,
    /// Whole-text parse, then token scan when that fails.
    DirectThenTokenScan,
}

/// Rule for one numeric line item field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub field: ItemField,
    pub label: &'static str,
    /// Absence is an error.
    pub required: bool,
    /// Value used when the field is absent and not required.
    pub default_on_absence: Option<Decimal>,
    pub strategy: ExtractionStrategy,
    /// Whole-text OCR confusions replaced before parsing.
    pub ocr_substitutions: &'static [(&'static str, &'static str)],
}

pub const QUANTITY_POLICY: FieldPolicy = FieldPolicy {
    field: ItemField::Quantity,
    label: labels::QUANTITY,
    required: false,
    default_on_absence: Some(Decimal::ONE),
    strategy: ExtractionStrategy::DirectThenTokenScan,
    ocr_substitutions: &[("I", "1")],
};

pub const PRICE_POLICY: FieldPolicy = FieldPolicy {
    field: ItemField::Price,
    label: labels::PRICE,
    required: true,
    default_on_absence: None,
    strategy: ExtractionStrategy::TokenScan,
    ocr_substitutions: &[],
};

pub const UNIT_PRICE_POLICY: FieldPolicy = FieldPolicy {
    field: ItemField::UnitPrice,
    label: labels::UNIT_PRICE,
    required: false,
    default_on_absence: Some(Decimal::ZERO),
    strategy: ExtractionStrategy::TokenScan,
    ocr_substitutions: &[],
};

/// Numeric field rules, in evaluation order.
pub const ITEM_FIELD_POLICIES: [FieldPolicy; 3] = [QUANTITY_POLICY, PRICE_POLICY, UNIT_PRICE_POLICY];

impl FieldPolicy {
    /// Read this field from a line item's fields.
    pub fn resolve(&self, fields: &[RawField], item_index: usize) -> Result<Decimal, ReceiptError> {
        let raw = find(fields, self.label);

        if raw.is_empty() {
            return match (self.required, self.default_on_absence) {
                (false, Some(default)) => Ok(default),
                _ => Err(self.field.missing(item_index)),
            };
        }

        let text = self
            .ocr_substitutions
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
            .unwrap_or(raw);

        let value = match self.strategy {
            ExtractionStrategy::Direct => parse_decimal(text),
            ExtractionStrategy::TokenScan => extract_amount(text).ok(),
            ExtractionStrategy::DirectThenTokenScan => parse_decimal(text).or_else(|| {
                trace!(item_index, raw_value = raw, label = self.label, "falling back to token scan");
                extract_amount(text).ok()
            }),
        };

        value.ok_or_else(|| self.field.unparsable(item_index, raw))
    }
}

/// Builds one [`ReceiptItem`] from a line item's fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineItemBuilder;

impl LineItemBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the item at position `item_index`.
    ///
    /// The name is taken as is and may be empty; numeric fields follow
    /// [`ITEM_FIELD_POLICIES`] and the first failure is returned.
    pub fn build(&self, fields: &[RawField], item_index: usize) -> Result<ReceiptItem, ReceiptError> {
        let name = find(fields, labels::ITEM).to_string();

        let mut values = [Decimal::ZERO; 3];
        for (slot, policy) in values.iter_mut().zip(ITEM_FIELD_POLICIES.iter()) {
            *slot = policy.resolve(fields, item_index)?;
        }
        let [quantity, price, unit_price] = values;

        debug!(item_index, %name, %quantity, %price, %unit_price, "built line item");

        Ok(ReceiptItem {
            name,
            quantity,
            price,
            unit_price,
        })
    }
}
