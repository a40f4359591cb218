//! imgcrop WASM - WebAssembly bindings for imgcrop
//!
//! This crate exposes the imgcrop-core editing session to JavaScript and
//! TypeScript cropper components.
//!
//! # Module Structure
//!
//! - `session` - The `CropSession` class: pan/zoom/rotate handlers, crop
//!   callback, reset and export
//! - `types` - WASM-compatible wrapper types for export results
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession } from '@imgcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new CropSession();
//! session.setImageBytes(new Uint8Array(await file.arrayBuffer()));
//! session.onCropComplete({ x: 0, y: 0, width: 100, height: 100 });
//! const png = session.getProcessedImage();
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::JsCropSession;
pub use types::JsExportedImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
