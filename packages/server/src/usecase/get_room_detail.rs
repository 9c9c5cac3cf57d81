//! UseCase: Room 詳細取得

use std::sync::Arc;

use syncvia_shared::time::Clock;

use crate::domain::{MembershipGateway, RoomId, RoomRegistry, Timestamp};

use super::{error::GetRoomDetailError, get_rooms::RoomOverview};

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn RoomRegistry>,
    gateway: Arc<dyn MembershipGateway>,
    clock: Arc<dyn Clock>,
}

impl GetRoomDetailUseCase {
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

    /// 指定された Room の詳細を取得
    ///
    /// 再生状態も参加者もない Room は存在しないものとして扱います。
    pub async fn execute(&self, room_id: String) -> Result<RoomOverview, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(GetRoomDetailError::InvalidRoomId)?;

        let state = self.registry.get(&room_id).await;
        let participants = self.gateway.members(room_id.clone()).await;
        if state.is_none() && participants.is_empty() {
            return Err(GetRoomDetailError::RoomNotFound);
        }

        let now = Timestamp::new(self.clock.now_millis());
        Ok(RoomOverview::new(room_id, participants, state, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMembershipGateway, PlaybackMode, PlaybackPosition, PlaybackState},
        infrastructure::repository::InMemoryRoomRegistry,
    };
    use syncvia_shared::time::FixedClock;

    fn usecase_with(
        registry: Arc<InMemoryRoomRegistry>,
        gateway: MockMembershipGateway,
    ) -> GetRoomDetailUseCase {
        GetRoomDetailUseCase::new(registry, Arc::new(gateway), Arc::new(FixedClock::new(0)))
    }

    #[tokio::test]
    async fn test_get_room_detail_with_state_only() {
        // テスト項目: 参加者がいなくても再生状態があれば詳細が返る
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let state = PlaybackState::new(
            PlaybackMode::Paused,
            PlaybackPosition::new(5.0).unwrap(),
            Timestamp::new(0),
        );
        registry
            .set(&RoomId::new("movie".to_string()).unwrap(), state)
            .await;
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().returning(|_| Vec::new());
        let usecase = usecase_with(registry, gateway);

        // when (操作):
        let detail = usecase.execute("movie".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(detail.state, Some(state));
        assert_eq!(detail.current_position, Some(state.position));
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found() {
        // テスト項目: 状態も参加者もない Room は RoomNotFound になる
        // given (前提条件):
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().returning(|_| Vec::new());
        let usecase = usecase_with(Arc::new(InMemoryRoomRegistry::new()), gateway);

        // when (操作):
        let result = usecase.execute("ghost".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(GetRoomDetailError::RoomNotFound));
    }

    #[tokio::test]
    async fn test_get_room_detail_invalid_id() {
        // テスト項目: 長すぎる Room ID は InvalidRoomId になる
        // given (前提条件):
        let mut gateway = MockMembershipGateway::new();
        gateway.expect_members().never();
        let usecase = usecase_with(Arc::new(InMemoryRoomRegistry::new()), gateway);

        // when (操作):
        let result = usecase.execute("x".repeat(RoomId::MAX_LEN + 1)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomDetailError::InvalidRoomId(_))));
    }
}
