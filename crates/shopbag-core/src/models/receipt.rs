//! Canonical receipt model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized shopping receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Store name (first line of the header block).
    pub merchant: String,

    /// Transaction date.
    pub date: NaiveDate,

    /// Total amount as printed.
    pub total: Decimal,

    /// ISO currency code attached to the total; empty when not detected.
    pub currency: String,

    /// Purchased lines in printed order.
    pub items: Vec<ReceiptItem>,
}

/// A single purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    /// Item description; may be empty when the extractor found none.
    pub name: String,

    /// Quantity or weight.
    pub quantity: Decimal,

    /// Line price.
    pub price: Decimal,

    /// Price per unit; zero when not printed.
    pub unit_price: Decimal,
}

/// Identity used to spot the same receipt being submitted twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub merchant: String,
    pub date: NaiveDate,
    pub total: Decimal,
}

impl DuplicateKey {
    /// Whether `self` identifies the same purchase as an already `stored` key.
    ///
    /// Dates and totals must be equal; the stored merchant only has to contain
    /// this one (ASCII case-insensitive).
    pub fn matches(&self, stored: &DuplicateKey) -> bool {
        self.date == stored.date
            && self.total == stored.total
            && stored
                .merchant
                .to_ascii_lowercase()
                .contains(&self.merchant.to_ascii_lowercase())
    }
}

impl Receipt {
    /// Key for duplicate detection.
    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            merchant: self.merchant.clone(),
            date: self.date,
            total: self.total,
        }
    }

    /// Sum of line prices.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.price).sum()
    }
}
