use glam::DVec2;

use crate::homography::ProjectiveTransform;

/// Compensates a systematic detection bias: the thresholded blob sits a
/// little above where the pointer actually touches. Display pixels, added
/// after the projective division.
pub const DEFAULT_Y_OFFSET: f64 = 20.0;

/// Applies a solved transform to raw camera points, frame by frame.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    transform: ProjectiveTransform,
    y_offset: f64,
}

impl CoordinateMapper {
    pub fn new(transform: ProjectiveTransform) -> Self {
        Self::with_y_offset(transform, DEFAULT_Y_OFFSET)
    }

    pub fn with_y_offset(transform: ProjectiveTransform, y_offset: f64) -> Self {
        Self {
            transform,
            y_offset,
        }
    }

    /// Maps one camera point into display space, or `None` when the
    /// transform's denominator vanishes for this point. Deterministic:
    /// the same input always yields the identical output.
    pub fn map(&self, camera: DVec2) -> Option<DVec2> {
        self.transform
            .apply(camera)
            .map(|p| DVec2::new(p.x, p.y + self.y_offset))
    }

    pub fn transform(&self) -> &ProjectiveTransform {
        &self.transform
    }
}
