//! サーバーからクライアントへ送信するイベント
//!
//! ドメイン層はワイヤーフォーマットを知りません。JSON への変換は
//! Infrastructure 層（`infrastructure::dto::conversion`）が担当します。

use super::{
    entity::{Participant, PlaybackMode},
    value_object::{ConnectionId, PlaybackPosition},
};

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// 新しい参加者が Room に参加した（本人以外に通知）
    ParticipantJoined { participant: Participant },
    /// 参加者が Room から離脱した（残りの参加者に通知）
    ParticipantLeft { participant_id: ConnectionId },
    /// 他の参加者による再生状態の変更（送信者以外に通知）
    VideoStateUpdate {
        mode: PlaybackMode,
        position: PlaybackPosition,
    },
    /// 途中参加者への現在の再生状態（リクエストした本人にのみ送信）
    RoomStateResponse {
        mode: PlaybackMode,
        position: PlaybackPosition,
    },
}
