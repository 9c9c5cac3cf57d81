//! UseCase: Room 一覧取得

use std::{collections::BTreeMap, sync::Arc};

use syncvia_shared::time::Clock;

use crate::domain::{
    MembershipGateway, Participant, PlaybackPosition, PlaybackState, RoomId, RoomRegistry,
    Timestamp,
};

/// Room の参加者と再生状態をまとめたもの
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOverview {
    pub id: RoomId,
    /// 接続時刻順の参加者
    pub participants: Vec<Participant>,
    pub state: Option<PlaybackState>,
    /// 取得時点まで外挿した位置
    pub current_position: Option<PlaybackPosition>,
}

impl RoomOverview {
    pub(crate) fn new(
        id: RoomId,
        participants: Vec<Participant>,
        state: Option<PlaybackState>,
        now: Timestamp,
    ) -> Self {
        let current_position = state.map(|state| state.extrapolate(now));
        Self {
            id,
            participants,
            state,
            current_position,
        }
    }
}

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
    gateway: Arc<dyn MembershipGateway>,
    clock: Arc<dyn Clock>,
}

impl GetRoomsUseCase {
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

    /// 再生状態を持つ Room と参加者のいる Room を ID 順に返す
    pub async fn execute(&self) -> Vec<RoomOverview> {
        let mut rooms: BTreeMap<RoomId, Option<PlaybackState>> = self
            .registry
            .rooms()
            .await
            .into_iter()
            .map(|(id, state)| (id, Some(state)))
            .collect();
        for id in self.gateway.occupied_rooms().await {
            rooms.entry(id).or_insert(None);
        }

        let now = Timestamp::new(self.clock.now_millis());
        let mut overviews = Vec::with_capacity(rooms.len());
        for (id, state) in rooms {
            let participants = self.gateway.members(id.clone()).await;
            overviews.push(RoomOverview::new(id, participants, state, now));
        }
        overviews
    }
}
