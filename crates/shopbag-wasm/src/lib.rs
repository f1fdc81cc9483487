//! WASM bindings for shopping receipt normalization.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use wasm_bindgen::prelude::*;

use shopbag_core::receipt::rules;
use shopbag_core::{ExpenseDocument, Receipt, ReceiptAssembler, ReceiptNormalizer};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn to_js(receipt: &Receipt) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(receipt).map_err(js_error)
}

/// Assemble a receipt from canonical or Textract JSON.
///
/// Returns the receipt object; decimals are exact strings and the date is
/// `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn assemble_receipt(json: &str) -> Result<JsValue, JsValue> {
    let receipt = ReceiptAssembler::new().assemble_json(json).map_err(js_error)?;
    to_js(&receipt)
}

/// First amount token in `text`, e.g. `"EUR 23,50"` gives `"23.50"`.
#[wasm_bindgen]
pub fn extract_amount(text: &str) -> Option<String> {
    rules::extract_amount(text).ok().map(|d| d.to_string())
}

/// Receipt date as `YYYY-MM-DD`, using the default two-digit-year pivot.
#[wasm_bindgen]
pub fn normalize_date(text: &str) -> Option<String> {
    rules::normalize_date(text).ok().map(|d| d.to_string())
}

/// Receipt scanner class for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    assembler: ReceiptAssembler,
}

#[wasm_bindgen]
impl ReceiptScanner {
    /// Create a new receipt scanner.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            assembler: ReceiptAssembler::new(),
        }
    }

    /// Configure the two-digit-year pivot for `dd.mm.yy` dates.
    #[wasm_bindgen]
    pub fn set_two_digit_year_pivot(&mut self, pivot: u8) {
        self.assembler = ReceiptAssembler::new().with_two_digit_year_pivot(pivot);
    }

    /// Current two-digit-year pivot.
    #[wasm_bindgen(getter)]
    pub fn two_digit_year_pivot(&self) -> u8 {
        self.assembler.two_digit_year_pivot()
    }

    /// Assemble a receipt from canonical or Textract JSON text.
    #[wasm_bindgen]
    pub fn assemble(&self, json: &str) -> Result<JsValue, JsValue> {
        let receipt = self.assembler.assemble_json(json).map_err(js_error)?;
        to_js(&receipt)
    }

    /// Assemble a receipt from an already parsed canonical document object.
    #[wasm_bindgen]
    pub fn assemble_document(&self, document: JsValue) -> Result<JsValue, JsValue> {
        let document: ExpenseDocument =
            serde_wasm_bindgen::from_value(document).map_err(js_error)?;
        let receipt = self.assembler.assemble(&document).map_err(js_error)?;
        to_js(&receipt)
    }
}

impl Default for ReceiptScanner {
    fn default() -> Self {
        Self::new()
    }
}
