//! Message formatting utilities for client display.

use chrono::Local;
use syncvia_server::domain::PlaybackMode;

use crate::reconciler::{Correction, LocalAction};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Banner printed after connecting
    pub fn format_connected(name: &str, room_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("You are '{}' in room '{}'.\n", name, room_id));
        output.push_str("Commands: play | pause | seek <secs> | status | quit\n");
        output.push_str("============================================================\n");
        output
    }

    /// Format a participant-joined notification
    pub fn format_participant_joined(display_name: &str, participant_id: &str) -> String {
        format!(
            "\n[{}] + {} ({}) joined\n",
            clock_time(),
            display_name,
            short_id(participant_id)
        )
    }

    /// Format a participant-left notification
    pub fn format_participant_left(participant_id: &str) -> String {
        format!("\n[{}] - {} left\n", clock_time(), short_id(participant_id))
    }

    /// Format an applied `video-state-update` or `room-state-response`
    ///
    /// # Arguments
    ///
    /// * `source` - "update" for a peer's change, "snapshot" for a recovery reply
    /// * `mode` / `position` - the received state
    /// * `correction` - what the reconciler did to the local player
    pub fn format_remote_state(
        source: &str,
        mode: PlaybackMode,
        position: f64,
        correction: &Correction,
    ) -> String {
        let action = if correction.seeked {
            format!("seeked (drift {:.2}s)", correction.drift)
        } else {
            format!("in sync (drift {:.2}s)", correction.drift)
        };
        format!(
            "\n[{}] {} {} at {} -> {}\n",
            clock_time(),
            source,
            mode_label(mode),
            format_position(position),
            action
        )
    }

    /// Format the result of a local command
    pub fn format_local_action(action: LocalAction, emitted: bool) -> String {
        let label = match action {
            LocalAction::Play => "play".to_string(),
            LocalAction::Pause => "pause".to_string(),
            LocalAction::Seek(position) => format!("seek {}", format_position(position)),
        };
        if emitted {
            format!("{} (sent)\n", label)
        } else {
            format!("{} (local only, remote change just applied)\n", label)
        }
    }

    /// Format the `status` command output
    pub fn format_status(mode: PlaybackMode, position: f64, suppressed: bool) -> String {
        format!(
            "{} at {}{}\n",
            mode_label(mode),
            format_position(position),
            if suppressed { " [suppressed]" } else { "" }
        )
    }
}

fn mode_label(mode: PlaybackMode) -> &'static str {
    match mode {
        PlaybackMode::Playing => "playing",
        PlaybackMode::Paused => "paused",
    }
}

fn clock_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// `mm:ss.s` (or `h:mm:ss.s` past an hour)
fn format_position(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).round() as u64;
    let (hours, rest) = (tenths / 36_000, tenths % 36_000);
    let (minutes, rest) = (rest / 600, rest % 600);
    let (secs, tenth) = (rest / 10, rest % 10);
    if hours > 0 {
        format!("{}:{:02}:{:02}.{}", hours, minutes, secs, tenth)
    } else {
        format!("{:02}:{:02}.{}", minutes, secs, tenth)
    }
}

fn short_id(participant_id: &str) -> &str {
    participant_id.get(..8).unwrap_or(participant_id)
}
