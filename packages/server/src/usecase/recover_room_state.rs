//! UseCase: 途中参加者の再生状態の復元（Late-Joiner Recovery）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RecoverRoomStateUseCase::execute() メソッド
//! - 再生中の状態の外挿と、リクエストした本人のみへの送信
//!
//! ### なぜこのテストが必要か
//! - 再生中の Room に途中参加した場合、経過時間分だけ進んだ位置が届くことを保証
//! - 状態のない Room では何も送られないことを保証（クライアントはタイムアウトしない）
//! - 他の参加者に room-state-response が漏れないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生中（外挿あり）、一時停止中（外挿なし）
//! - エッジケース：状態のない Room、時計の巻き戻り
//! - 異常系：不正な Room ID、送信先の接続が存在しない

use std::sync::Arc;

use syncvia_shared::time::Clock;

use crate::domain::{
    ConnectionId, MembershipGateway, OutboundEvent, PlaybackMode, PlaybackPosition, RoomId,
    RoomRegistry, Timestamp,
};

use super::error::RecoverRoomStateError;

/// 途中参加者に送信した再生状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomSnapshot {
    pub mode: PlaybackMode,
    /// 送信時点まで外挿した位置
    pub position: PlaybackPosition,
}

/// 再生状態復元のユースケース
pub struct RecoverRoomStateUseCase {
    registry: Arc<dyn RoomRegistry>,
    gateway: Arc<dyn MembershipGateway>,
    clock: Arc<dyn Clock>,
}

impl RecoverRoomStateUseCase {
    /// 新しい RecoverRoomStateUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        gateway: Arc<dyn MembershipGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            gateway,
            clock,
        }
    }

    /// 現在の再生状態をリクエストした本人にのみ送信
    ///
    /// Room の状態を読んでから送信し終えるまでロックを保持するため、
    /// 同じ Room のより新しい video-state-update に追い越されることはありません。
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RoomSnapshot))` - 送信した状態
    /// * `Ok(None)` - Room に状態がない（何も送信しない）
    /// * `Err(RecoverRoomStateError)` - Room ID が不正、または送信に失敗
    pub async fn execute(
        &self,
        requester: ConnectionId,
        room_id: String,
    ) -> Result<Option<RoomSnapshot>, RecoverRoomStateError> {
        let room_id = RoomId::new(room_id).map_err(RecoverRoomStateError::MalformedEvent)?;

        // 状態のない Room のスロットを作らない
        if self.registry.get(&room_id).await.is_none() {
            tracing::debug!("No playback state for '{}', nothing to recover", room_id);
            return Ok(None);
        }

        let slot = self.registry.lock(&room_id).await;
        let Some(state) = *slot else {
            // 確認とロックの間に破棄された
            return Ok(None);
        };

        let snapshot = RoomSnapshot {
            mode: state.mode,
            position: state.extrapolate(Timestamp::new(self.clock.now_millis())),
        };
        self.gateway
            .unicast(
                requester,
                OutboundEvent::RoomStateResponse {
                    mode: snapshot.mode,
                    position: snapshot.position,
                },
            )
            .await
            .map_err(RecoverRoomStateError::Unicast)?;
        drop(slot);

        Ok(Some(snapshot))
    }
}
