//! Per-frame draw context.
//!
//! The context carries the eye position for the frame being drawn. Artists
//! build their relative-to-eye encoder from it on every draw, so eye-relative
//! vertices never outlive the eye they were computed against.

use glam::DVec3;

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::rte::EyeRelativeEncoder;

/// Eye state for the current frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawContext {
    eye: Option<DVec3>,
    frame: u64,
}

impl DrawContext {
    /// Creates a context with no eye established.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given eye position.
    pub fn with_eye(eye: DVec3) -> Self {
        Self {
            eye: Some(eye),
            frame: 0,
        }
    }

    /// Starts a new frame looking through `camera`.
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.frame += 1;
        self.eye = Some(camera.eye());
    }

    /// Sets the eye position.
    pub fn set_eye(&mut self, eye: DVec3) {
        self.eye = Some(eye);
    }

    /// Forgets the eye position.
    pub fn clear_eye(&mut self) {
        self.eye = None;
    }

    /// Returns true if an eye position is set.
    pub fn has_eye(&self) -> bool {
        self.eye.is_some()
    }

    /// Returns the eye position.
    ///
    /// There is no fallback to the world origin: drawing against an assumed
    /// eye would bring back exactly the precision loss RTE encoding removes.
    pub fn eye(&self) -> RenderResult<DVec3> {
        self.eye.ok_or(RenderError::EyeNotEstablished)
    }

    /// Returns the number of frames started with [`DrawContext::begin_frame`].
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Builds the relative-to-eye encoder for the current eye.
    pub fn encoder(&self) -> RenderResult<EyeRelativeEncoder> {
        EyeRelativeEncoder::new(self.eye()?)
    }
}
