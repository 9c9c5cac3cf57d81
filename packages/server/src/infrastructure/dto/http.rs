//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PlaybackModeDto;

/// Playback state as exposed by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStateDto {
    pub mode: PlaybackModeDto,
    /// Position recorded by the last accepted change (seconds)
    pub position_seconds: f64,
    /// Position extrapolated to the time of the request (seconds)
    pub current_position_seconds: f64,
    /// When the last change was accepted (RFC 3339)
    pub observed_at: String,
}

/// Room summary for list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Display names of the connected participants
    pub participants: Vec<String>,
    pub state: Option<PlaybackStateDto>,
}

/// Participant detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub participant_id: String,
    pub display_name: String,
    pub connected_at: String,
}

/// Room detail for detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub state: Option<PlaybackStateDto>,
}
