//! UseCase: 再生状態の変更（State Mutator）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChangePlaybackStateUseCase::execute() メソッド
//! - 検証 → Registry への上書き → 送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 不正なイベントが Registry を変更しないことを保証（黙って破棄）
//! - 送信者へのエコーや ACK が発生しないことを保証
//! - observed_at がサーバーの受理時刻になることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：再生・一時停止・巻き戻しシーク
//! - 異常系：負の位置、空の Room ID
//! - エッジケース：送信者しかいない Room（ブロードキャスト対象なし）
//! - エッジケース：参加者のいない Room への書き込み（EvictWhenEmpty では残さない）

use std::sync::Arc;

use syncvia_shared::time::Clock;

use crate::domain::{
    ConnectionId, MembershipGateway, OutboundEvent, PlaybackMode, PlaybackPosition,
    PlaybackState, RoomId, RoomRegistry, Timestamp,
};

use super::{error::ChangePlaybackStateError, evict_rooms::EvictRoomsUseCase};

/// 受理された変更の結果
#[derive(Debug, Clone, PartialEq)]
pub struct StateChangeReport {
    /// Registry に書き込まれた状態
    pub state: PlaybackState,
    /// video-state-update を送信できた接続数
    pub delivered: usize,
    /// 送信後も Registry に状態が残っているか
    pub retained: bool,
}

/// 再生状態変更のユースケース
pub struct ChangePlaybackStateUseCase {
    /// RoomRegistry（再生状態ストアの抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// MembershipGateway（メッセージ通知の抽象化）
    gateway: Arc<dyn MembershipGateway>,
    /// 受理時刻の取得に使用する時計
    clock: Arc<dyn Clock>,
    /// 参加者のいない Room の状態を破棄するユースケース
    evict_rooms: Arc<EvictRoomsUseCase>,
}

impl ChangePlaybackStateUseCase {
    /// 新しい ChangePlaybackStateUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        gateway: Arc<dyn MembershipGateway>,
        clock: Arc<dyn Clock>,
        evict_rooms: Arc<EvictRoomsUseCase>,
    ) -> Self {
        Self {
            registry,
            gateway,
            clock,
            evict_rooms,
        }
    }

    /// 再生状態の変更を実行
    ///
    /// 1. `room_id` と `position_seconds` を検証（不正なら Registry は変更しない）
    /// 2. Room のロックを取得し、`{mode, position, observed_at: now}` で上書き
    /// 3. ロックを保持したまま、送信者以外の参加者に video-state-update を送信
    /// 4. Room に参加者がいなければ、保持ポリシーに従って状態を破棄
    ///
    /// 送信者が Room に参加している必要はありません。参加者のいない Room は
    /// 最後の参加者の離脱というきっかけがないため、書き込み直後に破棄を判定します。
    /// ロックを保持したまま送信するため、同じ Room の更新は書き込み順に配信されます。
    /// 送信者への ACK はありません。
    ///
    /// # Returns
    ///
    /// * `Ok(StateChangeReport)` - 受理された状態と送信数
    /// * `Err(ChangePlaybackStateError)` - 不正なイベント（呼び出し側で破棄する）
    pub async fn execute(
        &self,
        sender: ConnectionId,
        room_id: String,
        mode: PlaybackMode,
        position_seconds: f64,
    ) -> Result<StateChangeReport, ChangePlaybackStateError> {
        // 1. 検証
        let room_id = RoomId::new(room_id).map_err(ChangePlaybackStateError::MalformedEvent)?;
        let position = PlaybackPosition::new(position_seconds)
            .map_err(ChangePlaybackStateError::MalformedEvent)?;

        // 2. Registry に上書き
        let mut slot = self.registry.lock(&room_id).await;
        let state = PlaybackState::new(mode, position, Timestamp::new(self.clock.now_millis()));
        *slot = Some(state);

        // 3. 送信者以外にブロードキャスト
        let delivered = match self
            .gateway
            .broadcast(
                room_id.clone(),
                OutboundEvent::VideoStateUpdate { mode, position },
                Some(sender),
            )
            .await
        {
            Ok(delivered) => delivered,
            Err(e) => {
                tracing::warn!("Failed to broadcast video-state-update in '{}': {}", room_id, e);
                0
            }
        };

        // 4. 誰もいない Room には状態を残さない
        let retained = !self.evict_rooms.release(&room_id, slot).await;

        Ok(StateChangeReport {
            state,
            delivered,
            retained,
        })
    }
}
