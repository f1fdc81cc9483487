//! Amount extraction from noisy receipt text.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::AmountParseError;
use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{AMOUNT_TOKEN, PLAIN_DECIMAL};

/// Amount field extractor.
///
/// Reads `digits[,.]digits` tokens anywhere in the text, so currency symbols
/// and labels around the number are ignored. Precision is kept as printed.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let token = AMOUNT_TOKEN.find(text)?;
        let amount = parse_decimal(token.as_str())?;
        Some(ExtractionMatch::new(amount, token.as_str()).with_position(token.start(), token.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_TOKEN
            .find_iter(text)
            .filter_map(|token| {
                parse_decimal(token.as_str()).map(|amount| {
                    ExtractionMatch::new(amount, token.as_str())
                        .with_position(token.start(), token.end())
                })
            })
            .collect()
    }
}

/// Extract the first amount token of `text`.
///
/// Fails when there is no token, or when the first token does not fit a
/// decimal (e.g. too many digits); later tokens are never tried.
pub fn extract_amount(text: &str) -> Result<Decimal, AmountParseError> {
    AmountExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .ok_or_else(|| AmountParseError {
            raw_value: text.to_string(),
        })
}

/// Parse the whole of `text` as a decimal, reading a comma as the separator.
///
/// Only plain `[+-]digits[,.digits]` text is read, and a value that does not
/// fit a decimal exactly is rejected rather than rounded.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    if !PLAIN_DECIMAL.is_match(text) {
        return None;
    }
    Decimal::from_str_exact(&text.replace(',', ".")).ok()
}
