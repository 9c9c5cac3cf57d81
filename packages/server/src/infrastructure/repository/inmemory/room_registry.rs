//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する `RoomRegistry` trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの構成
//!
//! ```text
//! Mutex<HashMap<RoomId, Arc<Mutex<Option<PlaybackState>>>>>
//!   └ 外側: スロットの検索・作成・削除の間だけ保持
//!       └ 内側: Room ごとのスロット。read-modify-write の間保持
//! ```
//!
//! ロックの順序は常に「内側 → 外側」です。外側のロックを保持したまま内側のロックを
//! 待つ操作はないため、デッドロックしません。
//!
//! `lock` は内側のロックを取得した後、そのスロットがまだ表に登録されているかを確認します。
//! 待っている間に `evict` で破棄されていた場合は、新しいスロットを作成してやり直します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{PlaybackSlot, PlaybackState, RoomId, RoomRegistry, Timestamp};

type Slot = Arc<Mutex<Option<PlaybackState>>>;

/// インメモリ Room Registry 実装
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    /// Room ID ごとの再生状態スロット
    slots: Mutex<HashMap<RoomId, Slot>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn existing_slot(&self, room_id: &RoomId) -> Option<Slot> {
        let slots = self.slots.lock().await;
        slots.get(room_id).cloned()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn get(&self, room_id: &RoomId) -> Option<PlaybackState> {
        let slot = self.existing_slot(room_id).await?;
        let state = slot.lock().await;
        *state
    }

    async fn set(&self, room_id: &RoomId, state: PlaybackState) {
        let mut slot = self.lock(room_id).await;
        *slot = Some(state);
    }

    async fn lock(&self, room_id: &RoomId) -> PlaybackSlot {
        loop {
            let slot = {
                let mut slots = self.slots.lock().await;
                slots.entry(room_id.clone()).or_default().clone()
            };
            let guard = slot.clone().lock_owned().await;

            let registered = {
                let slots = self.slots.lock().await;
                slots
                    .get(room_id)
                    .is_some_and(|current| Arc::ptr_eq(current, &slot))
            };
            if registered {
                return guard;
            }
            tracing::debug!("Slot of room '{}' was evicted while waiting, retrying", room_id);
        }
    }

    async fn remove(&self, room_id: &RoomId) -> Option<PlaybackState> {
        self.existing_slot(room_id).await?;
        let slot = self.lock(room_id).await;
        self.evict(room_id, slot).await
    }

    async fn evict(&self, room_id: &RoomId, mut slot: PlaybackSlot) -> Option<PlaybackState> {
        let state = slot.take();
        let mut slots = self.slots.lock().await;
        if slots
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, OwnedMutexGuard::mutex(&slot)))
        {
            slots.remove(room_id);
        }
        state
    }

    async fn remove_stale(&self, room_id: &RoomId, observed_before: Timestamp) -> bool {
        if self.existing_slot(room_id).await.is_none() {
            return false;
        }
        let slot = self.lock(room_id).await;
        let stale = slot.is_none_or(|state| state.observed_at < observed_before);
        if stale {
            self.evict(room_id, slot).await;
        }
        stale
    }

    async fn rooms(&self) -> Vec<(RoomId, PlaybackState)> {
        let entries: Vec<(RoomId, Slot)> = {
            let slots = self.slots.lock().await;
            slots
                .iter()
                .map(|(id, slot)| (id.clone(), slot.clone()))
                .collect()
        };

        let mut rooms = Vec::with_capacity(entries.len());
        for (room_id, slot) in entries {
            if let Some(state) = *slot.lock().await {
                rooms.push((room_id, state));
            }
        }
        rooms.sort_by(|a, b| a.0.cmp(&b.0));
        rooms
    }
}
