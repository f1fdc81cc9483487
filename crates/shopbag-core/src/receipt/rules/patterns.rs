//! Common regex patterns for receipt field extraction.
//!
//! Digit classes are spelled `[0-9]` so that only ASCII digits count; the
//! decimal parser downstream cannot read any other digit.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Decimal token anywhere in the text: 45,90 or 45.90
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"[0-9]+[,.][0-9]+"
    ).unwrap();

    // Whole-string d.m.y shape; selects the short-year layout only
    pub static ref DOTTED_SHORT_DATE: Regex = Regex::new(
        r"^[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{1,2}$"
    ).unwrap();

    // Zero-padded dd.mm.yy
    pub static ref DOTTED_SHORT_DATE_PARTS: Regex = Regex::new(
        r"^([0-9]{2})\.([0-9]{2})\.([0-9]{2})$"
    ).unwrap();

    // Zero-padded dd/mm/yyyy, hyphens already folded into slashes
    pub static ref SLASH_DATE: Regex = Regex::new(
        r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$"
    ).unwrap();

    // Whole-string plain decimal: optional sign, digits, optional fraction
    pub static ref PLAIN_DECIMAL: Regex = Regex::new(
        r"^[+-]?[0-9]+([.,][0-9]+)?$"
    ).unwrap();
}
