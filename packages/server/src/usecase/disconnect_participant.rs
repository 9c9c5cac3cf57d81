//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 接続の登録解除、participant-left の通知、空になった Room の破棄
//!
//! ### なぜこのテストが必要か
//! - 切断時に同じ Room の残りの参加者に通知されることを保証
//! - 最後の参加者が切断した場合に再生状態が破棄されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）、Room 未参加のまま切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MembershipGateway, OutboundEvent, RoomId};

use super::evict_rooms::EvictRoomsUseCase;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MembershipGateway（メッセージ通知の抽象化）
    gateway: Arc<dyn MembershipGateway>,
    /// 空になった Room の破棄
    evict_rooms: Arc<EvictRoomsUseCase>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(gateway: Arc<dyn MembershipGateway>, evict_rooms: Arc<EvictRoomsUseCase>) -> Self {
        Self {
            gateway,
            evict_rooms,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 切断した接続が所属していた Room（Room 未参加なら `None`）
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<RoomId> {
        let room_id = self.gateway.unregister_connection(connection_id).await?;

        let event = OutboundEvent::ParticipantLeft {
            participant_id: connection_id,
        };
        if let Err(e) = self.gateway.broadcast(room_id.clone(), event, None).await {
            tracing::warn!("Failed to notify participant-left in '{}': {}", room_id, e);
        }
        self.evict_rooms.evict_if_empty(&room_id).await;

        Some(room_id)
    }
}
