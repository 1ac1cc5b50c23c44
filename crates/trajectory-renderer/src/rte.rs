//! Relative-to-eye (RTE) vertex encoding
//!
//! GPUs interpolate positions in f32, which has 24 bits of mantissa. At
//! interplanetary distances (~1e11 m) one f32 ulp is over 8 km, so casting
//! world coordinates to f32 before subtracting the eye produces visible
//! jitter. The encoder instead subtracts the eye in f64 and splits the
//! offset into a coarse f32 part and the f32 residual of that rounding:
//!
//! ```text
//! R = P - E                (f64)
//! C = f32(R)
//! L = f32(R - f64(C))
//! GPU: offset = C + L
//! ```
//!
//! The resulting error scales with the distance from the eye, not with the
//! magnitude of the world coordinate.

use glam::DVec3;

use crate::error::{RenderError, RenderResult};
use crate::traits::VertexSink;
use crate::vertex::RteVertex;

/// Split `point` into an eye-relative coarse/residual pair.
pub fn split_relative_to_eye(point: DVec3, eye: DVec3) -> RteVertex {
    let relative = point - eye;
    let coarse = relative.as_vec3();
    let residual = (relative - coarse.as_dvec3()).as_vec3();

    RteVertex {
        coarse: coarse.to_array(),
        residual: residual.to_array(),
    }
}

/// Encodes world points relative to a fixed eye position.
///
/// An encoder only exists for an established, finite eye; build a fresh one
/// for every draw so the eye is never stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeRelativeEncoder {
    eye: DVec3,
}

impl EyeRelativeEncoder {
    /// Create an encoder for the given eye position.
    pub fn new(eye: DVec3) -> RenderResult<Self> {
        if !eye.is_finite() {
            return Err(RenderError::NonFiniteEye(eye.to_array()));
        }
        Ok(Self { eye })
    }

    /// The eye position points are encoded against.
    pub fn eye(&self) -> DVec3 {
        self.eye
    }

    /// Encode a single world point.
    pub fn encode(&self, point: DVec3) -> RteVertex {
        split_relative_to_eye(point, self.eye)
    }

    /// Encode every point and submit it to `sink`, in order.
    ///
    /// Returns the number of submitted vertices.
    pub fn encode_into<I>(&self, points: I, sink: &mut dyn VertexSink) -> usize
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut count = 0;
        for point in points {
            sink.submit(self.encode(point));
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    /// Offsets spanning sub-unit to local-scene distances.
    const OFFSETS: [DVec3; 4] = [
        DVec3::new(0.125, -0.5, 0.75),
        DVec3::new(123.456789, -98765.4321, 0.001234),
        DVec3::new(-999_999.123456, 0.3, 42.0),
        DVec3::new(1.0e-3, 2.5e5, -7.77),
    ];

    fn reconstruction_error(point: DVec3, eye: DVec3) -> f64 {
        let expected = point - eye;
        let vertex = split_relative_to_eye(point, eye);
        (vertex.reconstruct().as_dvec3() - expected).length() / expected.length()
    }

    #[test]
    fn test_interplanetary_scenario() {
        let point = DVec3::new(1.0e11, 0.0, 0.0);
        let eye = DVec3::new(1.0e11, 0.0, 1000.0);
        let vertex = split_relative_to_eye(point, eye);

        assert_eq!(vertex.coarse, [0.0, 0.0, -1000.0]);
        assert!(vertex.residual.iter().all(|c| c.abs() < 1.0e-3));
        assert_eq!(vertex.reconstruct(), Vec3::new(0.0, 0.0, -1000.0));
    }

    #[test]
    fn test_error_independent_of_magnitude() {
        for offset in OFFSETS {
            for base in [DVec3::ONE, DVec3::new(1.5e11, -1.5e11, 1.5e11)] {
                let point = base;
                let eye = base - offset;
                let error = reconstruction_error(point, eye);
                assert!(
                    error < 1.0e-6,
                    "relative error {error} at base {base:?} offset {offset:?}"
                );
            }
        }
    }

    #[test]
    fn test_naive_float_cast_loses_precision() {
        let point = DVec3::new(1.5e11, 0.0, 0.0);
        let eye = point - DVec3::new(123.456789, 0.0, 0.0);

        let naive = point.as_vec3() - eye.as_vec3();
        let naive_error = (naive.as_dvec3() - (point - eye)).length();
        assert!(naive_error > 1.0);

        let encoded = split_relative_to_eye(point, eye).reconstruct().as_dvec3();
        assert!((encoded - (point - eye)).length() < 1.0e-3);
    }

    #[test]
    fn test_residual_captures_rounding_error() {
        let eye = DVec3::new(-3.0e10, 7.0e9, 1.0e11);
        for offset in OFFSETS {
            let point = eye + offset;
            let expected = point - eye;
            let vertex = split_relative_to_eye(point, eye);

            // Coarse alone is only f32-accurate; with the residual the offset
            // is recovered to well beyond f32 precision.
            let recovered = vertex.reconstruct_f64();
            for axis in 0..3 {
                assert_relative_eq!(
                    recovered[axis],
                    expected[axis],
                    epsilon = 1.0e-12,
                    max_relative = 1.0e-12
                );
            }
        }
    }

    #[test]
    fn test_encoder_rejects_non_finite_eye() {
        let result = EyeRelativeEncoder::new(DVec3::new(0.0, f64::INFINITY, 0.0));
        assert!(matches!(result, Err(RenderError::NonFiniteEye(_))));
    }

    #[test]
    fn test_encode_into_preserves_order() {
        let encoder = EyeRelativeEncoder::new(DVec3::new(10.0, 0.0, 0.0)).unwrap();
        let mut vertices: Vec<RteVertex> = Vec::new();

        let count = encoder.encode_into(
            [DVec3::new(11.0, 0.0, 0.0), DVec3::new(12.0, 0.0, 0.0)],
            &mut vertices,
        );

        assert_eq!(count, 2);
        assert_eq!(vertices[0].coarse, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].coarse, [2.0, 0.0, 0.0]);
    }
}
