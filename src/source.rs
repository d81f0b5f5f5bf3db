use std::collections::VecDeque;

use glam::DVec2;

use crate::types::SourceError;

/// Frame acquisition plus blob detection, seen by the rest of the pipeline
/// as a stream of detected camera-space points.
///
/// `Ok(None)` means the frame carried no detectable pointer; `Err` is a
/// fatal capture failure. Implementations own the capture handle and
/// release it in `Drop`, so every exit path of the caller cleans up.
pub trait PointSource {
    fn next_point(&mut self) -> Result<Option<DVec2>, SourceError>;

    /// Camera frame size in pixels, used for quadrant gating.
    fn frame_w_h(&self) -> (u32, u32);
}

/// Replays a recorded point stream, for offline runs and tests.
///
/// Yields `SourceError::Closed` once the recording is exhausted.
pub struct ReplaySource {
    points: VecDeque<Option<DVec2>>,
    frame_w_h: (u32, u32),
}

impl ReplaySource {
    pub fn new(points: Vec<Option<DVec2>>, frame_w_h: (u32, u32)) -> Self {
        Self {
            points: points.into(),
            frame_w_h,
        }
    }

    pub fn remaining(&self) -> usize {
        self.points.len()
    }
}

impl PointSource for ReplaySource {
    fn next_point(&mut self) -> Result<Option<DVec2>, SourceError> {
        self.points.pop_front().ok_or(SourceError::Closed)
    }

    fn frame_w_h(&self) -> (u32, u32) {
        self.frame_w_h
    }
}
