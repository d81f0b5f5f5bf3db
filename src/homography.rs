use glam::DVec2;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::types::{CalibrationError, Correspondence};

/// Denominators closer to zero than this count as "no mapping".
const MIN_DENOM: f64 = 1e-9;

/// Residual above which a solved transform is rejected as degenerate.
const MAX_SOLVE_RESIDUAL: f64 = 1e-3;

/// Planar projective map from camera pixels to display pixels:
///
/// displayX = (a1*x + b1*y + c1) / (a3*x + b3*y + 1)
/// displayY = (a2*x + b2*y + c2) / (a3*x + b3*y + 1)
///
/// Produced once by [`solve_projective`] and read-only afterwards; every
/// coefficient is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectiveTransform {
    pub a1: f64,
    pub b1: f64,
    pub c1: f64,
    pub a2: f64,
    pub b2: f64,
    pub c2: f64,
    pub a3: f64,
    pub b3: f64,
}

impl ProjectiveTransform {
    /// Maps a raw camera point into display space.
    ///
    /// Returns `None` when the denominator vanishes; Inf/NaN never leak
    /// downstream.
    pub fn apply(&self, p: DVec2) -> Option<DVec2> {
        let den = self.a3 * p.x + self.b3 * p.y + 1.0;
        if !den.is_finite() || den.abs() < MIN_DENOM {
            return None;
        }
        Some(DVec2::new(
            (self.a1 * p.x + self.b1 * p.y + self.c1) / den,
            (self.a2 * p.x + self.b2 * p.y + self.c2) / den,
        ))
    }

    pub fn coeffs(&self) -> [f64; 8] {
        [
            self.a1, self.b1, self.c1, self.a2, self.b2, self.c2, self.a3, self.b3,
        ]
    }
}

/// Solves the planar projective transform from camera/display point pairs.
///
/// Builds the direct-linear-transform system, two rows per correspondence:
///
///   [x, y, 1, 0, 0, 0, -x*X, -y*X] . coeffs = X
///   [0, 0, 0, x, y, 1, -x*Y, -y*Y] . coeffs = Y
///
/// With exactly 4 pairs the 8x8 system is solved by LU with partial
/// pivoting; with more, by the normal equations. A singular system, a
/// non-finite coefficient, or a transform that fails to reproduce its own
/// correspondences reports `Degenerate`. Pure: identical input pairs give
/// identical coefficients.
pub fn solve_projective(pairs: &[Correspondence]) -> Result<ProjectiveTransform, CalibrationError> {
    if pairs.len() < 4 {
        return Err(CalibrationError::InsufficientCorrespondences(pairs.len()));
    }
    let rows = pairs.len() * 2;
    let mut a = na::DMatrix::<f64>::zeros(rows, 8);
    let mut b = na::DVector::<f64>::zeros(rows);
    for (i, pair) in pairs.iter().enumerate() {
        let (x, y) = (pair.camera.x, pair.camera.y);
        let (dx, dy) = (pair.display.x, pair.display.y);
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -x * dx;
        a[(r, 7)] = -y * dx;
        b[r] = dx;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -x * dy;
        a[(r + 1, 7)] = -y * dy;
        b[r + 1] = dy;
    }

    let solution = if pairs.len() == 4 {
        a.lu().solve(&b)
    } else {
        let atb = a.transpose() * &b;
        let ata = a.transpose() * a;
        ata.lu().solve(&atb)
    };
    let Some(v) = solution else {
        return Err(CalibrationError::Degenerate);
    };
    if v.iter().any(|c| !c.is_finite()) {
        return Err(CalibrationError::Degenerate);
    }

    let transform = ProjectiveTransform {
        a1: v[0],
        b1: v[1],
        c1: v[2],
        a2: v[3],
        b2: v[4],
        c2: v[5],
        a3: v[6],
        b3: v[7],
    };
    verify(&transform, pairs)?;
    Ok(transform)
}

/// Near-singular systems can slip through LU with finite but meaningless
/// coefficients; remapping the inputs catches those.
fn verify(
    transform: &ProjectiveTransform,
    pairs: &[Correspondence],
) -> Result<(), CalibrationError> {
    for pair in pairs {
        let Some(mapped) = transform.apply(pair.camera) else {
            return Err(CalibrationError::Degenerate);
        };
        if mapped.distance(pair.display) > MAX_SOLVE_RESIDUAL {
            return Err(CalibrationError::Degenerate);
        }
    }
    Ok(())
}
