//! Label lookup over unordered field collections.
//!
//! Absence is reported as an empty string rather than an error: downstream
//! rules decide what a missing field means.

use crate::models::expense::{labels, RawField};

/// First field whose label equals `label` exactly.
pub fn find_field<'a>(fields: &'a [RawField], label: &str) -> Option<&'a RawField> {
    fields.iter().find(|f| f.label == label)
}

/// Text of the first field labelled `label`, or `""` when none is.
pub fn find<'a>(fields: &'a [RawField], label: &str) -> &'a str {
    find_field(fields, label).map(|f| f.text.as_str()).unwrap_or("")
}

/// Currency code attached to the first `TOTAL` field, or `""`.
pub fn find_currency(fields: &[RawField]) -> &str {
    find_field(fields, labels::TOTAL)
        .and_then(|f| f.currency_code.as_deref())
        .unwrap_or("")
}
