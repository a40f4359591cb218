//! WASM-compatible wrapper types for export results.
//!
//! This module provides JavaScript-friendly types that wrap the core imgcrop
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use imgcrop_core::export::EXPORT_MIME_TYPE;
use imgcrop_core::{Clock, ExportedFile};
use wasm_bindgen::prelude::*;

/// An exported PNG for JavaScript.
///
/// # Memory Management
///
/// The encoded bytes live in WASM memory. `bytes()` copies them into a
/// `Uint8Array`; call it once and keep the result.
#[wasm_bindgen(js_name = ExportedImage)]
pub struct JsExportedImage {
    name: String,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

#[wasm_bindgen(js_class = ExportedImage)]
impl JsExportedImage {
    /// File name, `img-<timestamp>.png`.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Always `image/png`
    #[wasm_bindgen(getter = mimeType)]
    pub fn mime_type(&self) -> String {
        EXPORT_MIME_TYPE.to_string()
    }

    /// Size of the encoded file in bytes
    #[wasm_bindgen(getter = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the PNG bytes as Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<ExportedFile> for JsExportedImage {
    fn from(file: ExportedFile) -> Self {
        Self {
            name: file.name,
            width: file.width,
            height: file.height,
            bytes: file.bytes,
        }
    }
}

/// [`Clock`] reading `Date.now()`.
///
/// `SystemTime` is unavailable on `wasm32-unknown-unknown`.
pub(crate) struct JsClock;

impl Clock for JsClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Convert any displayable error into a JS error value.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
