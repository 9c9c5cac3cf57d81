//! Conversion logic between DTOs and domain entities.

use crate::domain::{OutboundEvent, PlaybackMode};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::PlaybackModeDto> for PlaybackMode {
    fn from(dto: dto::PlaybackModeDto) -> Self {
        match dto {
            dto::PlaybackModeDto::Playing => PlaybackMode::Playing,
            dto::PlaybackModeDto::Paused => PlaybackMode::Paused,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<PlaybackMode> for dto::PlaybackModeDto {
    fn from(model: PlaybackMode) -> Self {
        match model {
            PlaybackMode::Playing => dto::PlaybackModeDto::Playing,
            PlaybackMode::Paused => dto::PlaybackModeDto::Paused,
        }
    }
}

impl From<OutboundEvent> for dto::ServerMessage {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::ParticipantJoined { participant } => {
                dto::ServerMessage::ParticipantJoined {
                    participant_id: participant.id.to_string(),
                    display_name: participant.display_name.as_str().to_string(),
                }
            }
            OutboundEvent::ParticipantLeft { participant_id } => {
                dto::ServerMessage::ParticipantLeft {
                    participant_id: participant_id.to_string(),
                }
            }
            OutboundEvent::VideoStateUpdate { mode, position } => {
                dto::ServerMessage::VideoStateUpdate {
                    mode: mode.into(),
                    timestamp: position.seconds(),
                }
            }
            OutboundEvent::RoomStateResponse { mode, position } => {
                dto::ServerMessage::RoomStateResponse {
                    mode: mode.into(),
                    timestamp: position.seconds(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, Participant, PlaybackPosition, Timestamp};

    #[test]
    fn test_dto_mode_to_domain() {
        // テスト項目: DTO の再生モードがドメインの再生モードに変換される
        // given (前提条件):
        let playing = dto::PlaybackModeDto::Playing;
        let paused = dto::PlaybackModeDto::Paused;

        // when (操作) / then (期待する結果):
        assert_eq!(PlaybackMode::from(playing), PlaybackMode::Playing);
        assert_eq!(PlaybackMode::from(paused), PlaybackMode::Paused);
    }

    #[test]
    fn test_video_state_update_event_to_dto() {
        // テスト項目: VideoStateUpdate イベントが video-state-update DTO に変換される
        // given (前提条件):
        let event = OutboundEvent::VideoStateUpdate {
            mode: PlaybackMode::Playing,
            position: PlaybackPosition::new(10.0).unwrap(),
        };

        // when (操作):
        let message: dto::ServerMessage = event.into();

        // then (期待する結果):
        assert_eq!(
            message,
            dto::ServerMessage::VideoStateUpdate {
                mode: dto::PlaybackModeDto::Playing,
                timestamp: 10.0,
            }
        );
    }

    #[test]
    fn test_participant_joined_event_to_dto() {
        // テスト項目: ParticipantJoined イベントに参加者 ID と表示名が含まれる
        // given (前提条件):
        let id = ConnectionId::generate();
        let participant = Participant::new(
            id,
            DisplayName::new("Alex".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // when (操作):
        let message: dto::ServerMessage = OutboundEvent::ParticipantJoined { participant }.into();

        // then (期待する結果):
        assert_eq!(
            message,
            dto::ServerMessage::ParticipantJoined {
                participant_id: id.to_string(),
                display_name: "Alex".to_string(),
            }
        );
    }
}
