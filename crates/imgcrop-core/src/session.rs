//! Crop transform state for one editing session.
//!
//! A [`CropSession`] is created by its caller and handed by `&mut` to the
//! code that drives it; there is no shared or global instance. Mutators are
//! synchronous and total: a step that would leave the configured bounds is
//! absorbed by the policy, never reported.
//!
//! # Generations
//!
//! Every time the session starts over ([`reset`](CropSession::reset) or
//! [`set_image`](CropSession::set_image)) its generation advances. Export
//! jobs carry the generation they were taken from, and
//! [`accept`](CropSession::accept) only hands back results whose generation
//! still matches, so a slow export can never leak into the next session.

use serde::Serialize;

use crate::clamp::{normalize_rotation, step_rotation};
use crate::config::{ConfigError, CropConfig};
use crate::export::{Clock, ExportError, ExportJob, ExportOutcome, ExportedFile, FileNamer, SystemClock};
use crate::geometry::{CropRect, PanOffset};
use crate::source::SourceImage;

/// Observable state of a session, without the image payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub has_image: bool,
    pub pan: PanOffset,
    pub rotation: f64,
    pub zoom: f64,
    pub cropped_area_pixels: Option<CropRect>,
}

/// Pan, zoom, rotation and crop state for one image being edited.
pub struct CropSession {
    config: CropConfig,
    image: Option<SourceImage>,
    pan: PanOffset,
    rotation: f64,
    zoom: f64,
    cropped_area_pixels: Option<CropRect>,
    generation: u64,
    namer: FileNamer,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for CropSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSession")
            .field("config", &self.config)
            .field("image", &self.image.as_ref().map(SourceImage::kind))
            .field("pan", &self.pan)
            .field("rotation", &self.rotation)
            .field("zoom", &self.zoom)
            .field("cropped_area_pixels", &self.cropped_area_pixels)
            .field("generation", &self.generation)
            .finish()
    }
}

impl Default for CropSession {
    fn default() -> Self {
        Self::build(CropConfig::default(), Box::new(SystemClock))
    }
}

impl CropSession {
    /// Create a session with the given bounds, timestamping exports with
    /// the system clock.
    pub fn new(config: CropConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a session with a custom clock for export file names.
    pub fn with_clock(config: CropConfig, clock: impl Clock + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, Box::new(clock)))
    }

    fn build(config: CropConfig, clock: Box<dyn Clock>) -> Self {
        let zoom = config.initial_zoom();
        let rotation = config.initial_rotation();
        Self {
            config,
            image: None,
            pan: PanOffset::default(),
            rotation,
            zoom,
            cropped_area_pixels: None,
            generation: 0,
            namer: FileNamer::new(),
            clock,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn cropped_area_pixels(&self) -> Option<CropRect> {
        self.cropped_area_pixels
    }

    /// Current generation; advances on `reset` and `set_image`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Snapshot of the observable state.
    pub fn state(&self) -> SessionState {
        SessionState {
            has_image: self.image.is_some(),
            pan: self.pan,
            rotation: self.rotation,
            zoom: self.zoom,
            cropped_area_pixels: self.cropped_area_pixels,
        }
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Replace the source image. The reference is not validated.
    pub fn set_image(&mut self, image: Option<SourceImage>) {
        self.image = image;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            source = self.image.as_ref().map(SourceImage::kind).unwrap_or("none"),
            "image replaced"
        );
    }

    /// Replace the pan offset. Pan carries no bounds.
    pub fn set_pan(&mut self, pan: PanOffset) {
        self.pan = pan;
    }

    /// Set the zoom directly, clamped into range. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.config.zoom_bounds().clamp(zoom);
        }
    }

    /// Set the rotation directly, normalized by the rotation policy.
    /// Non-finite input is ignored.
    pub fn set_rotation(&mut self, rotation: f64) {
        if rotation.is_finite() {
            self.rotation = normalize_rotation(
                &self.config.rotation_bounds(),
                rotation,
                self.config.rotation_policy,
            );
        }
    }

    /// Whether a zoom-in button should be enabled.
    pub fn can_zoom_in(&self) -> bool {
        self.config.zoom_bounds().can_increase(self.zoom)
    }

    /// Whether a zoom-out button should be enabled.
    pub fn can_zoom_out(&self) -> bool {
        self.config.zoom_bounds().can_decrease(self.zoom)
    }

    /// Zoom in by two steps.
    pub fn zoom_in(&mut self) {
        let bounds = self.config.zoom_bounds();
        if bounds.can_increase(self.zoom) {
            self.zoom = bounds.step_up(self.zoom, self.config.zoom_increment(), self.config.zoom_policy);
        }
    }

    /// Zoom out by two steps.
    pub fn zoom_out(&mut self) {
        let bounds = self.config.zoom_bounds();
        if bounds.can_decrease(self.zoom) {
            self.zoom =
                bounds.step_down(self.zoom, self.config.zoom_increment(), self.config.zoom_policy);
        }
    }

    /// Rotate clockwise by one step.
    pub fn rotate_clockwise(&mut self) {
        self.rotation = step_rotation(
            &self.config.rotation_bounds(),
            self.rotation,
            self.config.rotation_step,
            self.config.rotation_policy,
        );
    }

    /// Rotate counter-clockwise by one step.
    pub fn rotate_counter_clockwise(&mut self) {
        self.rotation = step_rotation(
            &self.config.rotation_bounds(),
            self.rotation,
            -self.config.rotation_step,
            self.config.rotation_policy,
        );
    }

    /// Record the crop rectangle reported by the viewport geometry callback.
    ///
    /// May be called once per frame; only the latest value is kept.
    pub fn on_geometry_change(&mut self, cropped_area_pixels: CropRect) {
        tracing::trace!(
            x = cropped_area_pixels.x,
            y = cropped_area_pixels.y,
            width = cropped_area_pixels.width,
            height = cropped_area_pixels.height,
            "crop area changed"
        );
        self.cropped_area_pixels = Some(cropped_area_pixels);
    }

    /// Set or clear the crop rectangle directly.
    pub fn set_cropped_area_pixels(&mut self, cropped_area_pixels: Option<CropRect>) {
        self.cropped_area_pixels = cropped_area_pixels;
    }

    /// Return every field to its default and start a new generation.
    pub fn reset(&mut self) {
        self.image = None;
        self.pan = PanOffset::default();
        self.rotation = self.config.initial_rotation();
        self.zoom = self.config.initial_zoom();
        self.cropped_area_pixels = None;
        self.generation += 1;
        tracing::debug!(generation = self.generation, "session reset");
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Snapshot what an export needs.
    ///
    /// Returns `None` when there is no image or no crop rectangle yet; the
    /// caller has nothing to do.
    pub fn prepare_export(&mut self) -> Option<ExportJob> {
        let source = self.image.clone()?;
        let crop = self.cropped_area_pixels?;
        let name = self.namer.next_name(self.clock.now_millis());

        tracing::debug!(
            generation = self.generation,
            file = %name,
            rotation = self.rotation,
            "export prepared"
        );

        Some(ExportJob {
            generation: self.generation,
            source,
            crop,
            rotation: self.rotation,
            options: self.config.export,
            name,
        })
    }

    /// Whether results from `generation` still belong to this session.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Take back the result of a job, discarding it if the session has
    /// started over since the job was prepared.
    pub fn accept(&self, outcome: ExportOutcome) -> Option<ExportedFile> {
        if self.is_current(outcome.generation) {
            Some(outcome.file)
        } else {
            tracing::debug!(
                job_generation = outcome.generation,
                generation = self.generation,
                file = %outcome.file.name,
                "discarding stale export"
            );
            None
        }
    }

    /// Run the full export in place.
    ///
    /// `Ok(None)` means there was nothing to export (no image or no crop).
    ///
    /// # Errors
    ///
    /// Any failure of the pipeline, see [`ExportJob::run`].
    pub fn export_image(&mut self) -> Result<Option<ExportedFile>, ExportError> {
        match self.prepare_export() {
            Some(job) => Ok(self.accept(job.run()?)),
            None => Ok(None),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
