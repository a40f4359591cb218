//! WASM bindings for the crop editing session.
//!
//! One `CropSession` object backs one cropper component. The UI drives it
//! with button handlers and the viewport's crop-complete callback, then
//! calls `getProcessedImage()` on commit and hands the `File` to its upload
//! code.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new CropSession({ max_zoom: 4, rotation_step: 90 });
//! session.setImageDataUrl(reader.result as string);
//!
//! zoomInButton.onclick = () => session.zoomIn();
//! cropper.onCropComplete = (_area, pixels) => session.onCropComplete(pixels);
//!
//! const file = session.getProcessedImage();
//! if (file) await upload(file);
//! session.reset();
//! ```

use imgcrop_core::{Clock, CropConfig, CropRect, CropSession, PanOffset, SourceImage};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsClock, JsExportedImage};

/// Crop, zoom and rotate state for one image, exposed to JavaScript.
#[wasm_bindgen(js_name = CropSession)]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen(js_class = CropSession)]
impl JsCropSession {
    /// Create a session.
    ///
    /// `config` is optional; any of `min_zoom`, `max_zoom`, `zoom_step`,
    /// `min_rotation`, `max_rotation`, `rotation_step`, `zoom_policy`,
    /// `rotation_policy` and `export` may be given, the rest default.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        Self::with_clock(config, JsClock).map_err(to_js_error)
    }

    // ------------------------------------------------------------------
    // Source image
    // ------------------------------------------------------------------

    /// Use encoded file bytes (from `file.arrayBuffer()`) as the source.
    #[wasm_bindgen(js_name = setImageBytes)]
    pub fn set_image_bytes(&mut self, bytes: Vec<u8>) {
        self.inner.set_image(Some(SourceImage::from(bytes)));
    }

    /// Use a `data:` URL (from `FileReader.readAsDataURL`) as the source.
    #[wasm_bindgen(js_name = setImageDataUrl)]
    pub fn set_image_data_url(&mut self, url: String) {
        self.inner.set_image(Some(SourceImage::from_data_url(url)));
    }

    /// Drop the source image.
    #[wasm_bindgen(js_name = clearImage)]
    pub fn clear_image(&mut self) {
        self.inner.set_image(None);
    }

    #[wasm_bindgen(getter = hasImage)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    // ------------------------------------------------------------------
    // Pan / zoom / rotation
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = setPan)]
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.inner.set_pan(PanOffset::new(x, y));
    }

    /// Current pan as `{ x, y }`.
    pub fn pan(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.pan()).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, rotation: f64) {
        self.inner.set_rotation(rotation);
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    #[wasm_bindgen(js_name = canZoomIn)]
    pub fn can_zoom_in(&self) -> bool {
        self.inner.can_zoom_in()
    }

    #[wasm_bindgen(js_name = canZoomOut)]
    pub fn can_zoom_out(&self) -> bool {
        self.inner.can_zoom_out()
    }

    #[wasm_bindgen(js_name = rotateCw)]
    pub fn rotate_cw(&mut self) {
        self.inner.rotate_clockwise();
    }

    #[wasm_bindgen(js_name = rotateAntiCw)]
    pub fn rotate_anti_cw(&mut self) {
        self.inner.rotate_counter_clockwise();
    }

    // ------------------------------------------------------------------
    // Crop area
    // ------------------------------------------------------------------

    /// Viewport callback: `{ x, y, width, height }` in source pixels.
    #[wasm_bindgen(js_name = onCropComplete)]
    pub fn on_crop_complete(&mut self, cropped_area_pixels: JsValue) -> Result<(), JsValue> {
        let rect: CropRect =
            serde_wasm_bindgen::from_value(cropped_area_pixels).map_err(to_js_error)?;
        self.inner.on_geometry_change(rect);
        Ok(())
    }

    /// Set the crop area directly; `null` or `undefined` clears it.
    #[wasm_bindgen(js_name = setCroppedAreaPixels)]
    pub fn set_cropped_area_pixels(&mut self, cropped_area_pixels: JsValue) -> Result<(), JsValue> {
        let rect: Option<CropRect> =
            serde_wasm_bindgen::from_value(cropped_area_pixels).map_err(to_js_error)?;
        self.inner.set_cropped_area_pixels(rect);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Return everything to its defaults.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Bumped by `reset` and every image change.
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation() as f64
    }

    /// Snapshot `{ has_image, pan, rotation, zoom, cropped_area_pixels }`.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.state()).map_err(to_js_error)
    }

    /// The bounds and steps this session was created with.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Export the crop as a PNG `File`, or `undefined` when there is no
    /// image or no crop area yet.
    ///
    /// Runs synchronously and throws if the source cannot be decoded or
    /// the crop area is invalid.
    #[wasm_bindgen(js_name = getProcessedImage)]
    pub fn get_processed_image(&mut self) -> Result<Option<web_sys::File>, JsValue> {
        let Some(file) = self.inner.export_image().map_err(to_js_error)? else {
            return Ok(None);
        };

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));

        let options = web_sys::FilePropertyBag::new();
        options.set_type(file.mime_type());

        web_sys::File::new_with_u8_array_sequence_and_options(&parts, &file.name, &options).map(Some)
    }

    /// Export the crop as raw PNG bytes plus metadata, or `undefined` when
    /// there is nothing to export.
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&mut self) -> Result<Option<JsExportedImage>, JsValue> {
        self.inner
            .export_image()
            .map(|file| file.map(JsExportedImage::from))
            .map_err(to_js_error)
    }
}

impl JsCropSession {
    /// Build a session with an explicit clock.
    ///
    /// Used by the constructor and by native tests, which cannot call into JS.
    pub(crate) fn with_clock(
        config: CropConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, imgcrop_core::ConfigError> {
        Ok(Self {
            inner: CropSession::with_clock(config, clock)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn inner_mut(&mut self) -> &mut CropSession {
        &mut self.inner
    }
}
