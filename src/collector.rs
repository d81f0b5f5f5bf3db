use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use glam::DVec2;
use log::{debug, info};

use crate::source::PointSource;
use crate::types::{AnchorId, AnchorLayout, CalibrationError, CalibrationSet, Correspondence};

/// Classifies a camera point into the quadrant of the anchor it can
/// calibrate. Splits at the frame half-width and half-height; points on
/// the split lines go right/down.
pub fn quadrant_of(pt: DVec2, frame_w_h: (u32, u32)) -> AnchorId {
    let hw = frame_w_h.0 as f64 / 2.0;
    let hh = frame_w_h.1 as f64 / 2.0;
    match (pt.x < hw, pt.y < hh) {
        (true, true) => AnchorId::TopLeft,
        (false, true) => AnchorId::TopRight,
        (true, false) => AnchorId::BottomLeft,
        (false, false) => AnchorId::BottomRight,
    }
}

/// Cooperative cancellation for the blocking per-anchor wait loops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectorConfig {
    /// Upper bound on the wait for each anchor. `None` reproduces the
    /// unbounded wait of the original hardware protocol.
    pub timeout: Option<Duration>,
}

/// Runs the 4-step correspondence session: for each anchor in fixed order,
/// pull points until one lands in that anchor's quadrant with both
/// coordinates positive, then record it.
pub struct CorrespondenceCollector {
    pub layout: AnchorLayout,
    pub config: CollectorConfig,
}

impl CorrespondenceCollector {
    pub fn new(layout: AnchorLayout, config: CollectorConfig) -> Self {
        Self { layout, config }
    }

    /// Collects one correspondence per anchor, in `AnchorId::ORDER`.
    ///
    /// `on_captured` runs after each acceptance so a renderer can mark the
    /// anchor as calibrated; it has no effect on the result.
    pub fn collect<S: PointSource>(
        &self,
        source: &mut S,
        cancel: &CancelToken,
        mut on_captured: impl FnMut(AnchorId),
    ) -> Result<CalibrationSet, CalibrationError> {
        let mut pairs = Vec::with_capacity(AnchorId::ORDER.len());
        for anchor in AnchorId::ORDER {
            info!("waiting for signal in the {:?} quadrant", anchor);
            let camera = self.wait_for_anchor(source, anchor, cancel)?;
            debug!("{:?} captured at ({:.1}, {:.1})", anchor, camera.x, camera.y);
            on_captured(anchor);
            pairs.push(Correspondence {
                anchor,
                display: self.layout.anchor(anchor),
                camera,
            });
        }
        Ok(CalibrationSet { pairs })
    }

    fn wait_for_anchor<S: PointSource>(
        &self,
        source: &mut S,
        anchor: AnchorId,
        cancel: &CancelToken,
    ) -> Result<DVec2, CalibrationError> {
        let started = Instant::now();
        loop {
            if cancel.is_cancelled() {
                return Err(CalibrationError::Cancelled);
            }
            if let Some(limit) = self.config.timeout {
                if started.elapsed() >= limit {
                    return Err(CalibrationError::TimedOut {
                        anchor,
                        waited_ms: limit.as_millis() as u64,
                    });
                }
            }
            let Some(pt) = source.next_point()? else {
                continue;
            };
            // A non-positive coordinate is the detector's "nothing seen"
            // signal and never a valid candidate.
            if pt.x <= 0.0 || pt.y <= 0.0 {
                continue;
            }
            if quadrant_of(pt, source.frame_w_h()) == anchor {
                return Ok(pt);
            }
        }
    }
}
