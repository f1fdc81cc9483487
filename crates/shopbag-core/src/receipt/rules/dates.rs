//! Date normalization for receipt date fields.
//!
//! Two layouts are accepted. A text that is entirely `d.m.y` (one or two
//! digits per part) selects the dotted short-year layout, which must then be
//! zero-padded `dd.mm.yy`; anything else is read as `dd/mm/yyyy` after
//! folding hyphens into slashes. The discriminator picks exactly one layout
//! and a failure under it is final.

use chrono::NaiveDate;

use crate::error::{DateLayout, DateParseError};
use super::patterns::{DOTTED_SHORT_DATE, DOTTED_SHORT_DATE_PARTS, SLASH_DATE};

/// Default two-digit-year pivot: `00..=68` is 2000-2068, `69..=99` is 1969-1999.
pub const DEFAULT_TWO_DIGIT_YEAR_PIVOT: u8 = 69;

/// Date field normalizer with an explicit two-digit-year pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    pivot: u8,
}

impl DateNormalizer {
    /// Create a normalizer using [`DEFAULT_TWO_DIGIT_YEAR_PIVOT`].
    pub fn new() -> Self {
        Self {
            pivot: DEFAULT_TWO_DIGIT_YEAR_PIVOT,
        }
    }

    /// Set the two-digit-year pivot (clamped to 100).
    pub fn with_pivot(mut self, pivot: u8) -> Self {
        self.pivot = pivot.min(100);
        self
    }

    pub fn pivot(&self) -> u8 {
        self.pivot
    }

    /// Layout the text will be parsed under.
    pub fn classify(&self, text: &str) -> DateLayout {
        if DOTTED_SHORT_DATE.is_match(&clean(text)) {
            DateLayout::DottedShortYear
        } else {
            DateLayout::Slash
        }
    }

    /// Parse a raw date field into a calendar date.
    pub fn normalize(&self, text: &str) -> Result<NaiveDate, DateParseError> {
        let cleaned = clean(text);

        if DOTTED_SHORT_DATE.is_match(&cleaned) {
            let caps = DOTTED_SHORT_DATE_PARTS
                .captures(&cleaned)
                .ok_or_else(|| layout_mismatch(text, DateLayout::DottedShortYear))?;
            let year = self.expand_year(parse_part(&caps[3]));
            return to_date(year, &caps[2], &caps[1])
                .ok_or_else(|| out_of_range(text, DateLayout::DottedShortYear));
        }

        let slashed = cleaned.replace('-', "/");
        let caps = SLASH_DATE
            .captures(&slashed)
            .ok_or_else(|| layout_mismatch(text, DateLayout::Slash))?;

        to_date(parse_part(&caps[3]) as i32, &caps[2], &caps[1])
            .ok_or_else(|| out_of_range(text, DateLayout::Slash))
    }

    /// Map a two-digit year onto a full year around the pivot.
    pub fn expand_year(&self, short_year: u32) -> i32 {
        let short_year = short_year as i32;
        if short_year < i32::from(self.pivot) {
            2000 + short_year
        } else {
            1900 + short_year
        }
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a date field with the default pivot.
pub fn normalize_date(text: &str) -> Result<NaiveDate, DateParseError> {
    DateNormalizer::new().normalize(text)
}

// Scanners sometimes read a dot as a comma inside dates as well.
fn clean(text: &str) -> String {
    text.replace(',', ".")
}

// Captures are ASCII digits of bounded length, so this cannot fail.
fn parse_part(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

fn to_date(year: i32, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, parse_part(month), parse_part(day))
}

fn layout_mismatch(text: &str, layout: DateLayout) -> DateParseError {
    DateParseError::Layout {
        raw_value: text.to_string(),
        layout,
    }
}

fn out_of_range(text: &str, layout: DateLayout) -> DateParseError {
    DateParseError::OutOfRange {
        raw_value: text.to_string(),
        layout,
    }
}
