//! Local player abstraction.
//!
//! The reconciler only needs to read the current position and mode and to
//! seek or play/pause. `SimulatedPlayer` advances its position with a
//! monotonic clock so the CLI behaves like a real video element.

use syncvia_server::domain::PlaybackMode;
use tokio::time::Instant;

/// Player controlled by the reconciler
pub trait LocalPlayer: Send {
    /// Position in seconds at `now`
    fn current_time(&self, now: Instant) -> f64;

    fn mode(&self) -> PlaybackMode;

    /// Jump to `position` seconds
    fn seek(&mut self, position: f64, now: Instant);

    /// Switch between playing and paused without moving the position
    fn set_mode(&mut self, mode: PlaybackMode, now: Instant);
}

/// In-memory player whose position advances in real time while playing
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    mode: PlaybackMode,
    /// Position at `anchored_at`
    anchor_position: f64,
    anchored_at: Instant,
}

impl SimulatedPlayer {
    /// A paused player at 0 s
    pub fn new(now: Instant) -> Self {
        Self {
            mode: PlaybackMode::Paused,
            anchor_position: 0.0,
            anchored_at: now,
        }
    }

    fn re_anchor(&mut self, position: f64, now: Instant) {
        self.anchor_position = position.max(0.0);
        self.anchored_at = now;
    }
}

impl LocalPlayer for SimulatedPlayer {
    fn current_time(&self, now: Instant) -> f64 {
        match self.mode {
            PlaybackMode::Playing => {
                self.anchor_position
                    + now.saturating_duration_since(self.anchored_at).as_secs_f64()
            }
            PlaybackMode::Paused => self.anchor_position,
        }
    }

    fn mode(&self) -> PlaybackMode {
        self.mode
    }

    fn seek(&mut self, position: f64, now: Instant) {
        self.re_anchor(position, now);
    }

    fn set_mode(&mut self, mode: PlaybackMode, now: Instant) {
        if self.mode == mode {
            return;
        }
        let position = self.current_time(now);
        self.re_anchor(position, now);
        self.mode = mode;
    }
}
