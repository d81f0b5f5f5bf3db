use glam::DVec2;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("pointer event failed: {0}")]
    Emit(String),
}

/// Moves the system cursor to a display point and synthesizes one
/// primary-button press + release. The core pipeline only ever talks to
/// this trait; platform adapters live outside the crate.
pub trait PointerSink {
    fn emit(&mut self, point: DVec2) -> Result<(), EventError>;
}

/// Discards events.
#[derive(Debug, Default)]
pub struct NoopSink;

impl PointerSink for NoopSink {
    fn emit(&mut self, _point: DVec2) -> Result<(), EventError> {
        Ok(())
    }
}

/// Logs each event instead of touching the OS cursor, for offline replays.
#[derive(Debug, Default)]
pub struct LogSink {
    pub emitted: usize,
}

impl PointerSink for LogSink {
    fn emit(&mut self, point: DVec2) -> Result<(), EventError> {
        debug!("pointer event at ({:.1}, {:.1})", point.x, point.y);
        self.emitted += 1;
        Ok(())
    }
}
