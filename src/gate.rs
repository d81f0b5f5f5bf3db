use glam::DVec2;

/// Per-axis jump, in display pixels, above which a sample is treated as
/// sensor noise rather than genuine motion.
pub const DEFAULT_MAX_JUMP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingFirstSample,
    Tracking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No mapped point this frame (no detection or denominator failure).
    NoSample,
    /// First sample after (re)entering tracking; nothing to compare against.
    FirstSample,
    /// Current or previous point has a non-positive coordinate.
    InvalidPoint,
    /// Delta to the previous point exceeds the jump limit.
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOutcome {
    /// Emit one pointer event at this display point.
    Accepted(DVec2),
    Rejected(RejectReason),
}

/// Accepted motion segments, kept only for visual feedback.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    segments: Vec<(DVec2, DVec2)>,
}

impl Trajectory {
    pub fn push(&mut self, from: DVec2, to: DVec2) {
        self.segments.push((from, to));
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[(DVec2, DVec2)] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Decides, per frame, whether a mapped point is trustworthy enough to act
/// on: invalid and teleporting samples are dropped silently, everything
/// else extends the trajectory and emits one pointer event.
///
/// The comparison reference advances to the current frame's mapped point
/// whether or not the frame was accepted, so deltas are always between
/// consecutive raw frames, not consecutive accepted ones.
#[derive(Debug, Clone)]
pub struct MotionGate {
    max_jump: f64,
    previous: Option<DVec2>,
    trajectory: Trajectory,
}

impl Default for MotionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionGate {
    pub fn new() -> Self {
        Self::with_max_jump(DEFAULT_MAX_JUMP)
    }

    pub fn with_max_jump(max_jump: f64) -> Self {
        Self {
            max_jump,
            previous: None,
            trajectory: Trajectory::default(),
        }
    }

    pub fn state(&self) -> GateState {
        if self.previous.is_none() {
            GateState::AwaitingFirstSample
        } else {
            GateState::Tracking
        }
    }

    /// Feeds one frame's mapped point (or the lack of one) through the gate.
    pub fn advance(&mut self, mapped: Option<DVec2>) -> GateOutcome {
        let Some(current) = mapped else {
            // Skipped frame: drop the reference so the next sample starts
            // a fresh comparison chain.
            self.previous = None;
            return GateOutcome::Rejected(RejectReason::NoSample);
        };
        let previous = self.previous.replace(current);
        let Some(previous) = previous else {
            return GateOutcome::Rejected(RejectReason::FirstSample);
        };
        if previous.x <= 0.0 || previous.y <= 0.0 || current.x <= 0.0 || current.y <= 0.0 {
            return GateOutcome::Rejected(RejectReason::InvalidPoint);
        }
        if (current.x - previous.x).abs() >= self.max_jump
            || (current.y - previous.y).abs() >= self.max_jump
        {
            return GateOutcome::Rejected(RejectReason::Jump);
        }
        self.trajectory.push(previous, current);
        GateOutcome::Accepted(current)
    }

    /// Empties the trajectory; gate state and the comparison reference are
    /// untouched.
    pub fn clear_trajectory(&mut self) {
        self.trajectory.clear();
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }
}
