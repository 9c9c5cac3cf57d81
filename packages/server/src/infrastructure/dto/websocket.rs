//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`:
//!
//! ```text
//! {"type":"join-room","roomId":"movie"}
//! {"type":"video-state-change","roomId":"movie","mode":"playing","timestamp":10.0}
//! {"type":"request-room-state","roomId":"movie"}
//! ```
//!
//! The client crate uses the same types for the opposite direction.

use serde::{Deserialize, Serialize};

/// Playback mode on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackModeDto {
    Playing,
    Paused,
}

/// Messages sent from a client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join (or move to) a room
    JoinRoom { room_id: String },
    /// Local play/pause/seek to be stored and relayed to the other participants
    VideoStateChange {
        room_id: String,
        #[serde(alias = "state")]
        mode: PlaybackModeDto,
        /// Playback position in seconds
        timestamp: f64,
    },
    /// Ask for the current (extrapolated) room state
    RequestRoomState { room_id: String },
}

/// Messages sent from the server to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    ParticipantJoined {
        participant_id: String,
        display_name: String,
    },
    ParticipantLeft {
        participant_id: String,
    },
    VideoStateUpdate {
        mode: PlaybackModeDto,
        timestamp: f64,
    },
    RoomStateResponse {
        mode: PlaybackModeDto,
        timestamp: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_room_envelope() {
        // テスト項目: join-room は roomId フィールドを持つオブジェクトとして受け付け、素の文字列は受け付けない
        // given (前提条件):
        let envelope = r#"{"type":"join-room","roomId":"movie"}"#;
        let bare = r#""movie""#;

        // when (操作):
        let parsed = serde_json::from_str::<ClientMessage>(envelope);
        let rejected = serde_json::from_str::<ClientMessage>(bare);

        // then (期待する結果):
        assert_eq!(
            parsed.unwrap(),
            ClientMessage::JoinRoom {
                room_id: "movie".to_string()
            }
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn test_parse_video_state_change() {
        // テスト項目: video-state-change が正しくパースされる
        // given (前提条件):
        let json = r#"{"type":"video-state-change","roomId":"movie","mode":"playing","timestamp":10.0}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::VideoStateChange {
                room_id: "movie".to_string(),
                mode: PlaybackModeDto::Playing,
                timestamp: 10.0,
            }
        );
    }

    #[test]
    fn test_parse_video_state_change_with_state_alias() {
        // テスト項目: mode の代わりに state キーでも受け付ける
        // given (前提条件):
        let json = r#"{"type":"video-state-change","roomId":"movie","state":"paused","timestamp":3}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(matches!(
            msg,
            ClientMessage::VideoStateChange {
                mode: PlaybackModeDto::Paused,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_string_timestamp() {
        // テスト項目: timestamp が数値でない場合はパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"video-state-change","roomId":"movie","mode":"playing","timestamp":"abc"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        // テスト項目: 未知の再生モードはパースに失敗する
        // given (前提条件):
        let json = r#"{"type":"video-state-change","roomId":"movie","mode":"stopped","timestamp":1.0}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_room_state_response() {
        // テスト項目: room-state-response が期待する JSON 形式になる
        // given (前提条件):
        let msg = ServerMessage::RoomStateResponse {
            mode: PlaybackModeDto::Playing,
            timestamp: 105.0,
        };

        // when (操作):
        let json = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "room-state-response", "mode": "playing", "timestamp": 105.0})
        );
    }

    #[test]
    fn test_serialize_participant_joined_uses_camel_case() {
        // テスト項目: participant-joined のフィールド名が camelCase になる
        // given (前提条件):
        let msg = ServerMessage::ParticipantJoined {
            participant_id: "abc".to_string(),
            display_name: "Alex".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "participant-joined", "participantId": "abc", "displayName": "Alex"})
        );
    }
}
