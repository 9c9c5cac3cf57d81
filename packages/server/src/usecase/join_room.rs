//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - Membership Gateway への参加と participant-joined / participant-left の通知
//!
//! ### なぜこのテストが必要か
//! - 参加時に既存メンバーへ通知され、本人には通知されないことを保証
//! - 参加しただけでは再生状態が送られないことを保証（request-room-state が必要）
//! - Room の移動時に元の Room へ participant-left が届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい Room への参加、別の Room への移動
//! - 異常系：空の Room ID、未登録の接続
//! - エッジケース：同じ Room への再参加（通知なし）

use std::sync::Arc;

use crate::domain::{ConnectionId, JoinedRoom, MembershipGateway, OutboundEvent, RoomId};

use super::{error::JoinRoomError, evict_rooms::EvictRoomsUseCase};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// MembershipGateway（メッセージ通知の抽象化）
    gateway: Arc<dyn MembershipGateway>,
    /// 移動元の Room が空になった場合の破棄
    evict_rooms: Arc<EvictRoomsUseCase>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(gateway: Arc<dyn MembershipGateway>, evict_rooms: Arc<EvictRoomsUseCase>) -> Self {
        Self {
            gateway,
            evict_rooms,
        }
    }

    /// Room への参加を実行
    ///
    /// 参加しただけでは再生状態は送信されません。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続
    /// * `room_id` - 参加先の Room ID（未検証の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedRoom)` - 参加結果
    /// * `Err(JoinRoomError)` - Room ID が不正、または接続が未登録
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: String,
    ) -> Result<JoinedRoom, JoinRoomError> {
        let room_id = RoomId::new(room_id).map_err(JoinRoomError::InvalidRoomId)?;
        let joined = self.gateway.join(connection_id, room_id.clone()).await?;

        if let Some(previous_room) = &joined.previous_room {
            self.notify_left(previous_room, connection_id).await;
            self.evict_rooms.evict_if_empty(previous_room).await;
        }

        if !joined.already_member {
            let event = OutboundEvent::ParticipantJoined {
                participant: joined.participant.clone(),
            };
            if let Err(e) = self
                .gateway
                .broadcast(room_id.clone(), event, Some(connection_id))
                .await
            {
                tracing::warn!("Failed to notify participant-joined in '{}': {}", room_id, e);
            }
            tracing::info!(
                "{} ({}) joined room '{}'",
                joined.participant.display_name.as_str(),
                connection_id,
                room_id
            );
        }

        Ok(joined)
    }

    async fn notify_left(&self, room_id: &RoomId, connection_id: ConnectionId) {
        let event = OutboundEvent::ParticipantLeft {
            participant_id: connection_id,
        };
        if let Err(e) = self.gateway.broadcast(room_id.clone(), event, None).await {
            tracing::warn!("Failed to notify participant-left in '{}': {}", room_id, e);
        }
    }
}
