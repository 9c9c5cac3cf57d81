//! Client-side reconciliation of the room's playback state.
//!
//! Inbound `video-state-update` / `room-state-response` events drive the local
//! player. Applying one opens a suppression window so that the player changes
//! it causes are not sent back to the room as new `video-state-change` events.
//!
//! ```text
//!            apply_remote(now)
//!   Idle ───────────────────────▶ Suppressed { until: now + 1s }
//!    ▲                                 │
//!    └──────── now >= until ───────────┘   (read lazily, no timer)
//! ```
//!
//! Every method takes `now` explicitly; nothing here reads a clock.

use std::time::Duration;

use syncvia_server::{domain::PlaybackMode, infrastructure::dto::websocket::ClientMessage};
use tokio::time::Instant;

use crate::player::LocalPlayer;

/// How long local actions stay local after a remote state was applied
pub const SUPPRESSION_COOLDOWN: Duration = Duration::from_millis(1000);

/// Drift (seconds) tolerated before the local player is seeked
pub const DRIFT_THRESHOLD_SECS: f64 = 1.5;

/// Echo suppression state of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionGate {
    #[default]
    Idle,
    Suppressed { until: Instant },
}

impl SuppressionGate {
    /// Whether local actions may be emitted at `now`
    pub fn is_idle(&self, now: Instant) -> bool {
        match self {
            SuppressionGate::Idle => true,
            SuppressionGate::Suppressed { until } => now >= *until,
        }
    }

    /// Open (or extend) the window to `now + SUPPRESSION_COOLDOWN`
    fn suppress(&mut self, now: Instant) {
        *self = SuppressionGate::Suppressed {
            until: now + SUPPRESSION_COOLDOWN,
        };
    }
}

/// Action performed on the local player by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalAction {
    Play,
    Pause,
    Seek(f64),
}

/// What `apply_remote` did to the local player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// `|local − remote|` before any correction
    pub drift: f64,
    pub seeked: bool,
    pub mode_changed: bool,
}

/// Keeps one local player in step with a room
pub struct Reconciler<P> {
    room_id: String,
    player: P,
    gate: SuppressionGate,
}

impl<P: LocalPlayer> Reconciler<P> {
    pub fn new(room_id: impl Into<String>, player: P) -> Self {
        Self {
            room_id: room_id.into(),
            player,
            gate: SuppressionGate::Idle,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn gate(&self) -> SuppressionGate {
        self.gate
    }

    /// Apply a state received from the room
    ///
    /// The position is only corrected when the drift exceeds
    /// [`DRIFT_THRESHOLD_SECS`], so re-applying a converged state is a no-op
    /// for the position.
    pub fn apply_remote(
        &mut self,
        mode: PlaybackMode,
        position_seconds: f64,
        now: Instant,
    ) -> Correction {
        self.gate.suppress(now);

        let drift = (self.player.current_time(now) - position_seconds).abs();
        let seeked = drift > DRIFT_THRESHOLD_SECS;
        if seeked {
            self.player.seek(position_seconds, now);
        }

        let mode_changed = self.player.mode() != mode;
        if mode_changed {
            self.player.set_mode(mode, now);
        }

        tracing::debug!(
            "Applied remote {:?} at {:.3}s (drift {:.3}s, seeked: {})",
            mode,
            position_seconds,
            drift,
            seeked
        );
        Correction {
            drift,
            seeked,
            mode_changed,
        }
    }

    /// Apply a user action to the local player
    ///
    /// The action always takes effect locally. A `video-state-change` to send
    /// is returned only while the gate is idle.
    pub fn on_local_action(&mut self, action: LocalAction, now: Instant) -> Option<ClientMessage> {
        match action {
            LocalAction::Play => self.player.set_mode(PlaybackMode::Playing, now),
            LocalAction::Pause => self.player.set_mode(PlaybackMode::Paused, now),
            LocalAction::Seek(position) => self.player.seek(position, now),
        }

        if !self.gate.is_idle(now) {
            tracing::debug!("{:?} kept local (suppressed)", action);
            return None;
        }
        self.gate = SuppressionGate::Idle;

        Some(ClientMessage::VideoStateChange {
            room_id: self.room_id.clone(),
            mode: self.player.mode().into(),
            timestamp: self.player.current_time(now),
        })
    }

    /// Messages to send after (re)connecting: join, then ask for the state once
    pub fn handshake(&self) -> [ClientMessage; 2] {
        [
            ClientMessage::JoinRoom {
                room_id: self.room_id.clone(),
            },
            ClientMessage::RequestRoomState {
                room_id: self.room_id.clone(),
            },
        ]
    }
}
