//! UseCase: 空の Room の再生状態の破棄
//!
//! - `evict_if_empty`: 最後の参加者が抜けた直後に呼ばれる（`RoomRetention::EvictWhenEmpty` のときのみ破棄）
//! - `release`: 参加者のいない Room への書き込み直後に呼ばれ、同じ条件で破棄する
//! - `sweep_idle`: 定期的に呼ばれ、参加者がいない古い Room を破棄する（保持ポリシーに関係なく動作）

use std::{sync::Arc, time::Duration};

use syncvia_shared::time::Clock;

use crate::{
    config::RoomRetention,
    domain::{MembershipGateway, PlaybackSlot, RoomId, RoomRegistry, Timestamp},
};

/// Room 破棄のユースケース
pub struct EvictRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
    gateway: Arc<dyn MembershipGateway>,
    clock: Arc<dyn Clock>,
    retention: RoomRetention,
}

impl EvictRoomsUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        gateway: Arc<dyn MembershipGateway>,
        clock: Arc<dyn Clock>,
        retention: RoomRetention,
    ) -> Self {
        Self {
            registry,
            gateway,
            clock,
            retention,
        }
    }

    /// Room に誰もいなければ再生状態を破棄し、破棄した場合は `true` を返す
    pub async fn evict_if_empty(&self, room_id: &RoomId) -> bool {
        if self.retention != RoomRetention::EvictWhenEmpty {
            return false;
        }
        let slot = self.registry.lock(room_id).await;
        self.release(room_id, slot).await
    }

    /// ロック済みのスロットを解放する。Room に誰もいなければ破棄して `true` を返す
    ///
    /// 参加者の確認はロックを保持したまま行うため、確認と破棄の間に
    /// 同じ Room へ書き込まれることはありません。
    pub(crate) async fn release(&self, room_id: &RoomId, slot: PlaybackSlot) -> bool {
        if self.retention != RoomRetention::EvictWhenEmpty
            || !self.gateway.members(room_id.clone()).await.is_empty()
        {
            return false;
        }

        let evicted = self.registry.evict(room_id, slot).await.is_some();
        if evicted {
            tracing::info!("Room '{}' is empty, playback state evicted", room_id);
        }
        evicted
    }

    /// 参加者がおらず、最後の変更から `ttl` 以上経過した Room を破棄する
    ///
    /// 判定と削除の間に書き込まれた状態は破棄されません（`remove_stale` が再確認する）。
    pub async fn sweep_idle(&self, ttl: Duration) -> Vec<RoomId> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::new(self.clock.now_millis().saturating_sub(ttl_millis));
        let occupied = self.gateway.occupied_rooms().await;

        let mut evicted = Vec::new();
        for (room_id, state) in self.registry.rooms().await {
            if occupied.contains(&room_id) || state.observed_at >= cutoff {
                continue;
            }
            if self.registry.remove_stale(&room_id, cutoff).await {
                evicted.push(room_id);
            }
        }

        if !evicted.is_empty() {
            tracing::info!("Swept {} idle room(s)", evicted.len());
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionId, DisplayName, MockMembershipGateway, OutboundEvent, Participant,
            PlaybackMode, PlaybackPosition, PlaybackState,
        },
        infrastructure::{
            membership::WebSocketMembershipGateway, repository::InMemoryRoomRegistry,
        },
    };
    use syncvia_shared::time::ManualClock;
    use tokio::sync::mpsc;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn paused_at(observed_at: i64) -> PlaybackState {
        PlaybackState::new(
            PlaybackMode::Paused,
            PlaybackPosition::new(1.0).unwrap(),
            Timestamp::new(observed_at),
        )
    }

    fn someone() -> Participant {
        Participant::new(
            ConnectionId::generate(),
            DisplayName::anonymous(),
            Timestamp::new(0),
        )
    }

    #[tokio::test]
    async fn test_evict_if_empty_removes_state_of_empty_room() {
        // テスト項目: 参加者がいない Room の状態が破棄される
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        registry.set(&room("movie"), paused_at(0)).await;
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().returning(|_| Vec::new());
        let usecase = EvictRoomsUseCase::new(
            registry.clone(),
            Arc::new(gateway),
            Arc::new(ManualClock::new(0)),
            RoomRetention::EvictWhenEmpty,
        );

        // when (操作):
        let evicted = usecase.evict_if_empty(&room("movie")).await;

        // then (期待する結果):
        assert!(evicted);
        assert_eq!(registry.get(&room("movie")).await, None);
    }

    #[tokio::test]
    async fn test_evict_if_empty_keeps_occupied_room() {
        // テスト項目: 参加者が残っている Room の状態は破棄されない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        registry.set(&room("movie"), paused_at(0)).await;
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().returning(|_| vec![someone()]);
        let usecase = EvictRoomsUseCase::new(
            registry.clone(),
            Arc::new(gateway),
            Arc::new(ManualClock::new(0)),
            RoomRetention::EvictWhenEmpty,
        );

        // when (操作):
        let evicted = usecase.evict_if_empty(&room("movie")).await;

        // then (期待する結果):
        assert!(!evicted);
        assert!(registry.get(&room("movie")).await.is_some());
    }

    #[tokio::test]
    async fn test_keep_retention_never_evicts() {
        // テスト項目: 保持ポリシーが Keep の場合は空の Room でも破棄しない
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        registry.set(&room("movie"), paused_at(0)).await;
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().never();
        let usecase = EvictRoomsUseCase::new(
            registry.clone(),
            Arc::new(gateway),
            Arc::new(ManualClock::new(0)),
            RoomRetention::Keep,
        );

        // when (操作):
        let evicted = usecase.evict_if_empty(&room("movie")).await;

        // then (期待する結果):
        assert!(!evicted);
        assert!(registry.get(&room("movie")).await.is_some());
    }

    #[tokio::test]
    async fn test_sweep_idle_skips_occupied_and_recent_rooms() {
        // テスト項目: 定期掃除は参加者のいる Room と最近変更された Room を残す
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        registry.set(&room("abandoned"), paused_at(0)).await;
        registry.set(&room("watched"), paused_at(0)).await;
        registry.set(&room("recent"), paused_at(95_000)).await;
        let mut gateway = MockMembershipGateway::new();
        gateway
            .expect_occupied_rooms()
            .returning(|| vec![RoomId::new("watched".to_string()).unwrap()]);
        let usecase = EvictRoomsUseCase::new(
            registry.clone(),
            Arc::new(gateway),
            Arc::new(ManualClock::new(100_000)),
            RoomRetention::Keep,
        );

        // when (操作):
        let evicted = usecase.sweep_idle(Duration::from_secs(30)).await;

        // then (期待する結果):
        assert_eq!(evicted, vec![room("abandoned")]);
        assert_eq!(registry.get(&room("abandoned")).await, None);
        assert!(registry.get(&room("watched")).await.is_some());
        assert!(registry.get(&room("recent")).await.is_some());
    }

    #[tokio::test]
    async fn test_eviction_waits_for_writer_and_rechecks_members() {
        // テスト項目: 書き込み中の Room の破棄は書き込み完了まで待ち、その間に参加者が増えていれば破棄しない
        // given (前提条件): 誰もいない Room のスロットを書き込み側がロックしている
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let gateway = Arc::new(WebSocketMembershipGateway::new());
        let usecase = Arc::new(EvictRoomsUseCase::new(
            registry.clone(),
            gateway.clone(),
            Arc::new(ManualClock::new(0)),
            RoomRetention::EvictWhenEmpty,
        ));
        registry.set(&room("movie"), paused_at(0)).await;
        let mut slot = registry.lock(&room("movie")).await;

        // when (操作): 破棄を開始し、その間に bob が参加して書き込みが配信される
        let eviction = {
            let usecase = usecase.clone();
            tokio::spawn(async move { usecase.evict_if_empty(&room("movie")).await })
        };
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert!(!eviction.is_finished());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let bob = ConnectionId::generate();
        gateway
            .register_connection(bob, DisplayName::anonymous(), Timestamp::new(0), tx)
            .await;
        gateway.join(bob, room("movie")).await.unwrap();
        let playing = PlaybackState::new(
            PlaybackMode::Playing,
            PlaybackPosition::new(50.0).unwrap(),
            Timestamp::new(10),
        );
        *slot = Some(playing);
        gateway
            .broadcast(
                room("movie"),
                OutboundEvent::VideoStateUpdate {
                    mode: playing.mode,
                    position: playing.position,
                },
                None,
            )
            .await
            .unwrap();
        drop(slot);
        let evicted = eviction.await.unwrap();

        // then (期待する結果): bob が受け取った状態が Registry に残っている
        assert!(!evicted);
        assert!(rx.recv().await.unwrap().contains("video-state-update"));
        assert_eq!(gateway.members(room("movie")).await.len(), 1);
        assert_eq!(registry.get(&room("movie")).await, Some(playing));
    }
}
