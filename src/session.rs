use std::sync::mpsc::{Receiver, TryRecvError};

use log::{info, trace, warn};
use thiserror::Error;

use crate::collector::{CancelToken, CollectorConfig, CorrespondenceCollector};
use crate::events::{EventError, PointerSink};
use crate::gate::{GateOutcome, MotionGate};
use crate::homography::{ProjectiveTransform, solve_projective};
use crate::mapper::{CoordinateMapper, DEFAULT_Y_OFFSET};
use crate::source::PointSource;
use crate::types::{AnchorId, AnchorLayout, CalibrationError, CalibrationSet, SourceError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Event(#[from] EventError),
}

impl SessionError {
    /// Process exit code class: capture failures get their own code,
    /// everything else is an ordinary runtime error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::Source(_) => 2,
            SessionError::Event(_) => 1,
        }
    }
}

/// Commands the outer application can inject into the tracking loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flush the scribble trajectory.
    ClearTrajectory,
    Stop,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub y_offset: f64,
    pub max_jump: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            y_offset: DEFAULT_Y_OFFSET,
            max_jump: crate::gate::DEFAULT_MAX_JUMP,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingReport {
    pub frames: usize,
    pub emitted: usize,
    pub rejected: usize,
    pub trajectory_len: usize,
}

/// Runs the full calibration phase: collect one correspondence per anchor,
/// then solve. A degenerate solve fails here and tracking is never entered
/// with a partial transform.
pub fn calibrate<S: PointSource>(
    source: &mut S,
    layout: &AnchorLayout,
    config: &CollectorConfig,
    cancel: &CancelToken,
    on_captured: impl FnMut(AnchorId),
) -> Result<(CalibrationSet, ProjectiveTransform), CalibrationError> {
    let collector = CorrespondenceCollector::new(layout.clone(), config.clone());
    let set = collector.collect(source, cancel, on_captured)?;
    let transform = solve_projective(&set.pairs)?;
    info!("calibrated OK");
    Ok((set, transform))
}

/// The frame-driven tracking loop: next point, map, gate, emit.
///
/// Single-threaded and synchronous; events leave in frame arrival order.
/// Per-frame "no detection" and gate rejections are skipped frames. The
/// loop ends cleanly when the source closes or a `Stop` command arrives;
/// a capture failure propagates after the source has been dropped by the
/// caller's scope.
pub fn run_tracking<S: PointSource, K: PointerSink>(
    source: &mut S,
    transform: &ProjectiveTransform,
    config: &SessionConfig,
    sink: &mut K,
    commands: &Receiver<Command>,
) -> Result<TrackingReport, SessionError> {
    let mapper = CoordinateMapper::with_y_offset(*transform, config.y_offset);
    let mut gate = MotionGate::with_max_jump(config.max_jump);
    let mut report = TrackingReport::default();

    loop {
        match commands.try_recv() {
            Ok(Command::Stop) => break,
            Ok(Command::ClearTrajectory) => gate.clear_trajectory(),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        }

        let raw = match source.next_point() {
            Ok(raw) => raw,
            Err(SourceError::Closed) => break,
            Err(e) => {
                warn!("stopping tracking: {}", e);
                return Err(e.into());
            }
        };
        report.frames += 1;

        let mapped = raw.and_then(|p| mapper.map(p));
        match gate.advance(mapped) {
            GateOutcome::Accepted(point) => {
                sink.emit(point)?;
                report.emitted += 1;
            }
            GateOutcome::Rejected(reason) => {
                trace!("frame {} rejected: {:?}", report.frames, reason);
                report.rejected += 1;
            }
        }
    }

    report.trajectory_len = gate.trajectory().len();
    Ok(report)
}
