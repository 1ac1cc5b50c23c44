//! Double-precision camera for relative-to-eye rendering

use bytemuck::{Pod, Zeroable};
use glam::{DVec3, Mat4, Vec3};

use crate::config::CameraConfig;

/// Camera uniform buffer data
///
/// `view_proj` has no translation: vertices arrive already relative to the
/// eye, so the eye sits at the origin of view space.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection times eye-centered view rotation.
    pub view_proj: [[f32; 4]; 4],
    /// Trajectory color (RGBA).
    pub color: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
        }
    }
}

/// Look-at camera with world-space position and target in f64
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: DVec3,
    /// Point the camera looks at, in world space.
    pub target: DVec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Camera {
    /// Create a camera with default configuration
    pub fn new(position: DVec3, target: DVec3, aspect: f32) -> Self {
        Self::from_config(&CameraConfig::default(), position, target, aspect)
    }

    /// Create a camera from configuration
    pub fn from_config(config: &CameraConfig, position: DVec3, target: DVec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Z,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near_plane,
            far: config.far_plane.max(config.near_plane + 1.0),
        }
    }

    /// Update aspect ratio
    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// The eye position used for relative-to-eye encoding
    pub fn eye(&self) -> DVec3 {
        self.position
    }

    /// Move the eye, keeping the viewing direction
    pub fn translate(&mut self, delta: DVec3) {
        self.position += delta;
        self.target += delta;
    }

    /// View matrix with the eye at the origin.
    ///
    /// Only the direction to the target is cast to f32, so the matrix stays
    /// accurate at any distance from the world origin. A target on the eye
    /// looks along +Y; a view direction parallel to `up` picks another up
    /// axis, so the matrix is always finite.
    pub fn view_matrix_rte(&self) -> Mat4 {
        let forward = (self.target - self.position)
            .try_normalize()
            .map_or(Vec3::Y, |direction| direction.as_vec3());
        Mat4::look_to_rh(Vec3::ZERO, forward, stable_up(forward, self.up))
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get camera uniform data
    pub fn uniform(&self, color: [f32; 4]) -> CameraUniform {
        let view_proj = self.projection_matrix() * self.view_matrix_rte();
        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            color,
        }
    }
}

/// `up`, or a fallback axis when `up` is degenerate or parallel to `forward`.
fn stable_up(forward: Vec3, up: Vec3) -> Vec3 {
    const MIN_SIN_SQ: f32 = 1.0e-6;

    let candidates = [up, Vec3::Z, Vec3::Y, Vec3::X];
    candidates
        .into_iter()
        .find(|candidate| {
            let candidate = candidate.normalize_or_zero();
            forward.cross(candidate).length_squared() > MIN_SIN_SQ
        })
        .unwrap_or(Vec3::X)
}
