use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four display anchor positions, in calibration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorId {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl AnchorId {
    pub const ORDER: [AnchorId; 4] = [
        AnchorId::TopLeft,
        AnchorId::TopRight,
        AnchorId::BottomLeft,
        AnchorId::BottomRight,
    ];

    pub fn index(&self) -> usize {
        match self {
            AnchorId::TopLeft => 0,
            AnchorId::TopRight => 1,
            AnchorId::BottomLeft => 2,
            AnchorId::BottomRight => 3,
        }
    }
}

/// Reference canvas the default anchor positions are expressed against.
pub const REFERENCE_CANVAS: (u32, u32) = (1024, 768);

const DEFAULT_ANCHORS: [(f64, f64); 4] =
    [(40.0, 40.0), (1000.0, 40.0), (40.0, 740.0), (1000.0, 740.0)];

/// Fixed display-space target points shown during calibration.
///
/// `anchors` follows `AnchorId::ORDER`. The defaults match a 1024x768
/// canvas; use [`AnchorLayout::for_resolution`] for other display sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorLayout {
    pub canvas_w_h: (u32, u32),
    pub anchors: [DVec2; 4],
}

impl Default for AnchorLayout {
    fn default() -> Self {
        Self {
            canvas_w_h: REFERENCE_CANVAS,
            anchors: DEFAULT_ANCHORS.map(|(x, y)| DVec2::new(x, y)),
        }
    }
}

impl AnchorLayout {
    /// Scales the reference layout to the actual target resolution.
    pub fn for_resolution(width: u32, height: u32) -> Self {
        let sx = width as f64 / REFERENCE_CANVAS.0 as f64;
        let sy = height as f64 / REFERENCE_CANVAS.1 as f64;
        Self {
            canvas_w_h: (width, height),
            anchors: DEFAULT_ANCHORS.map(|(x, y)| DVec2::new(x * sx, y * sy)),
        }
    }

    pub fn anchor(&self, id: AnchorId) -> DVec2 {
        self.anchors[id.index()]
    }
}

/// One paired observation of the same physical point in camera and
/// display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub anchor: AnchorId,
    pub display: DVec2,
    pub camera: DVec2,
}

/// The completed output of a calibration session, one correspondence per
/// anchor in `AnchorId::ORDER`. Never mutated after collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSet {
    pub pairs: Vec<Correspondence>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not initialize capturing: {0}")]
    OpenFailed(String),
    #[error("unable to capture the frame: {0}")]
    FrameRead(String),
    #[error("point source closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("need at least 4 correspondences, got {0}")]
    InsufficientCorrespondences(usize),
    #[error("degenerate correspondences, the projective transform is not determined")]
    Degenerate,
    #[error("no valid signal for {anchor:?} within {waited_ms} ms")]
    TimedOut { anchor: AnchorId, waited_ms: u64 },
    #[error("calibration cancelled")]
    Cancelled,
    #[error(transparent)]
    Source(#[from] SourceError),
}
