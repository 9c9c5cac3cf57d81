//! WebSocket を使った MembershipGateway 実装
//!
//! ## 責務
//!
//! - 接続ごとの WebSocket `UnboundedSender` を管理
//! - 接続 → Room、Room → 接続の双方向の対応関係を管理
//! - イベントを JSON にエンコードしてクライアントへ送信（broadcast, unicast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信は `UnboundedSender::send` なので、どの操作もブロックしません。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, DisplayName, GatewayError, JoinedRoom, MembershipGateway, OutboundEvent,
        Participant, PusherChannel, RoomId, Timestamp,
    },
    infrastructure::dto::websocket::ServerMessage,
};

/// 接続 1 つ分の情報
struct ConnectionEntry {
    participant: Participant,
    sender: PusherChannel,
    room: Option<RoomId>,
}

#[derive(Default)]
struct MembershipTable {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl MembershipTable {
    /// 接続を現在の Room から外し、外した Room を返す（空になった Room のエントリは削除）
    fn detach(&mut self, connection_id: ConnectionId) -> Option<RoomId> {
        let entry = self.connections.get_mut(&connection_id)?;
        let room_id = entry.room.take()?;
        if let Some(members) = self.rooms.get_mut(&room_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
        Some(room_id)
    }
}

/// WebSocket を使った MembershipGateway 実装
///
/// ## 使用例
///
/// ```ignore
/// let gateway = WebSocketMembershipGateway::new();
/// gateway.register_connection(id, name, connected_at, tx).await;
/// gateway.join(id, room_id.clone()).await?;
/// gateway.broadcast(room_id, event, Some(id)).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMembershipGateway {
    table: Mutex<MembershipTable>,
}

impl WebSocketMembershipGateway {
    /// 新しい WebSocketMembershipGateway を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: OutboundEvent) -> Result<String, GatewayError> {
        let message = ServerMessage::from(event);
        serde_json::to_string(&message).map_err(|e| GatewayError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MembershipGateway for WebSocketMembershipGateway {
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        connected_at: Timestamp,
        sender: PusherChannel,
    ) {
        let mut table = self.table.lock().await;
        table.connections.insert(
            connection_id,
            ConnectionEntry {
                participant: Participant::new(connection_id, display_name, connected_at),
                sender,
                room: None,
            },
        );
        tracing::debug!("Connection '{}' registered to gateway", connection_id);
    }

    async fn unregister_connection(&self, connection_id: ConnectionId) -> Option<RoomId> {
        let mut table = self.table.lock().await;
        let room_id = table.detach(connection_id);
        table.connections.remove(&connection_id);
        tracing::debug!("Connection '{}' unregistered from gateway", connection_id);
        room_id
    }

    async fn join(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinedRoom, GatewayError> {
        let mut table = self.table.lock().await;

        let current_room = table
            .connections
            .get(&connection_id)
            .ok_or_else(|| GatewayError::ConnectionNotFound(connection_id.to_string()))?
            .room
            .clone();

        let already_member = current_room.as_ref() == Some(&room_id);
        let previous_room = if already_member {
            None
        } else {
            table.detach(connection_id)
        };

        table
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id);

        let entry = table
            .connections
            .get_mut(&connection_id)
            .ok_or_else(|| GatewayError::ConnectionNotFound(connection_id.to_string()))?;
        entry.room = Some(room_id);

        Ok(JoinedRoom {
            participant: entry.participant.clone(),
            previous_room,
            already_member,
        })
    }

    async fn members(&self, room_id: RoomId) -> Vec<Participant> {
        let table = self.table.lock().await;
        let mut participants: Vec<Participant> = table
            .rooms
            .get(&room_id)
            .into_iter()
            .flatten()
            .filter_map(|id| table.connections.get(id))
            .map(|entry| entry.participant.clone())
            .collect();

        // Sort by connection time, then id, for consistent ordering
        participants.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        participants
    }

    async fn occupied_rooms(&self) -> Vec<RoomId> {
        let table = self.table.lock().await;
        let mut rooms: Vec<RoomId> = table.rooms.keys().cloned().collect();
        rooms.sort();
        rooms
    }

    async fn broadcast(
        &self,
        room_id: RoomId,
        event: OutboundEvent,
        exclude: Option<ConnectionId>,
    ) -> Result<usize, GatewayError> {
        let content = Self::encode(event)?;
        let table = self.table.lock().await;

        let Some(members) = table.rooms.get(&room_id) else {
            return Ok(0);
        };

        let mut delivered = 0;
        for target in members.iter().filter(|id| Some(**id) != exclude) {
            let Some(entry) = table.connections.get(target) else {
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = entry.sender.send(content.clone()) {
                tracing::warn!("Failed to push message to connection '{}': {}", target, e);
            } else {
                delivered += 1;
            }
        }

        tracing::debug!(
            "Broadcasted to {} connection(s) in room '{}'",
            delivered,
            room_id
        );
        Ok(delivered)
    }

    async fn unicast(
        &self,
        connection_id: ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), GatewayError> {
        let content = Self::encode(event)?;
        let table = self.table.lock().await;

        let entry = table
            .connections
            .get(&connection_id)
            .ok_or_else(|| GatewayError::ConnectionNotFound(connection_id.to_string()))?;
        entry
            .sender
            .send(content)
            .map_err(|e| GatewayError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlaybackMode, PlaybackPosition};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - join: Room への参加、Room 間の移動、再参加
    // - broadcast: 送信者を除く現在のメンバーにのみ、1 回ずつ届くこと
    // - unicast: 1 つの接続にのみ届くこと
    // - unregister: 切断時に Room から外れること
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    async fn connect(
        gateway: &WebSocketMembershipGateway,
        name: &str,
        connected_at: i64,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        gateway
            .register_connection(
                id,
                DisplayName::new(name.to_string()).unwrap(),
                Timestamp::new(connected_at),
                tx,
            )
            .await;
        (id, rx)
    }

    fn update_event() -> OutboundEvent {
        OutboundEvent::VideoStateUpdate {
            mode: PlaybackMode::Playing,
            position: PlaybackPosition::new(10.0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_join_unregistered_connection_fails() {
        // テスト項目: 登録されていない接続は join できない
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let id = ConnectionId::generate();

        // when (操作):
        let result = gateway.join(id, room("movie")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GatewayError::ConnectionNotFound(id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_join_adds_member() {
        // テスト項目: join すると Room のメンバーになる
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, _rx) = connect(&gateway, "alice", 1000).await;

        // when (操作):
        let joined = gateway.join(alice, room("movie")).await.unwrap();

        // then (期待する結果):
        assert_eq!(joined.participant.id, alice);
        assert_eq!(joined.previous_room, None);
        assert!(!joined.already_member);
        let members = gateway.members(room("movie")).await;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_join_other_room_moves_connection() {
        // テスト項目: 別の Room に join すると元の Room から移動する
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, _rx) = connect(&gateway, "alice", 1000).await;
        gateway.join(alice, room("a")).await.unwrap();

        // when (操作):
        let joined = gateway.join(alice, room("b")).await.unwrap();

        // then (期待する結果):
        assert_eq!(joined.previous_room, Some(room("a")));
        assert!(gateway.members(room("a")).await.is_empty());
        assert_eq!(gateway.members(room("b")).await.len(), 1);
        assert_eq!(gateway.occupied_rooms().await, vec![room("b")]);
    }

    #[tokio::test]
    async fn test_rejoin_same_room_is_idempotent() {
        // テスト項目: 同じ Room への再 join はメンバーを重複させない
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, _rx) = connect(&gateway, "alice", 1000).await;
        gateway.join(alice, room("movie")).await.unwrap();

        // when (操作):
        let joined = gateway.join(alice, room("movie")).await.unwrap();

        // then (期待する結果):
        assert!(joined.already_member);
        assert_eq!(joined.previous_room, None);
        assert_eq!(gateway.members(room("movie")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_excludes_sender_and_other_rooms() {
        // テスト項目: broadcast は送信者と他の Room のメンバーには届かない
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, mut rx_alice) = connect(&gateway, "alice", 1000).await;
        let (bob, mut rx_bob) = connect(&gateway, "bob", 2000).await;
        let (carol, mut rx_carol) = connect(&gateway, "carol", 3000).await;
        gateway.join(alice, room("movie")).await.unwrap();
        gateway.join(bob, room("movie")).await.unwrap();
        gateway.join(carol, room("other")).await.unwrap();

        // when (操作):
        let delivered = gateway
            .broadcast(room("movie"), update_event(), Some(alice))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        let received = rx_bob.recv().await.unwrap();
        assert_eq!(
            received,
            r#"{"type":"video-state-update","mode":"playing","timestamp":10.0}"#
        );
        assert!(rx_bob.try_recv().is_err()); // at most once
        assert!(rx_alice.try_recv().is_err());
        assert!(rx_carol.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_receiver() {
        // テスト項目: 受信側が閉じた接続があってもブロードキャストは成功する
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, rx_alice) = connect(&gateway, "alice", 1000).await;
        let (bob, mut rx_bob) = connect(&gateway, "bob", 2000).await;
        gateway.join(alice, room("movie")).await.unwrap();
        gateway.join(bob, room("movie")).await.unwrap();
        drop(rx_alice);

        // when (操作):
        let delivered = gateway
            .broadcast(room("movie"), update_event(), None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx_bob.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room() {
        // テスト項目: メンバーのいない Room へのブロードキャストはエラーにならない
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();

        // when (操作):
        let result = gateway.broadcast(room("ghost"), update_event(), None).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_unicast_reaches_only_target() {
        // テスト項目: unicast は指定した接続にのみ届く
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, mut rx_alice) = connect(&gateway, "alice", 1000).await;
        let (bob, mut rx_bob) = connect(&gateway, "bob", 2000).await;
        gateway.join(alice, room("movie")).await.unwrap();
        gateway.join(bob, room("movie")).await.unwrap();

        // when (操作):
        let result = gateway
            .unicast(
                alice,
                OutboundEvent::RoomStateResponse {
                    mode: PlaybackMode::Paused,
                    position: PlaybackPosition::new(42.0).unwrap(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx_alice.recv().await.unwrap(),
            r#"{"type":"room-state-response","mode":"paused","timestamp":42.0}"#
        );
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unicast_unknown_connection() {
        // テスト項目: 存在しない接続への unicast はエラーを返す
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let id = ConnectionId::generate();

        // when (操作):
        let result = gateway.unicast(id, update_event()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GatewayError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_unregister_removes_from_room() {
        // テスト項目: 登録解除すると Room から外れ、所属していた Room が返る
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, _rx_alice) = connect(&gateway, "alice", 1000).await;
        let (bob, _rx_bob) = connect(&gateway, "bob", 2000).await;
        gateway.join(alice, room("movie")).await.unwrap();
        gateway.join(bob, room("movie")).await.unwrap();

        // when (操作):
        let left = gateway.unregister_connection(alice).await;

        // then (期待する結果):
        assert_eq!(left, Some(room("movie")));
        let members = gateway.members(room("movie")).await;
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, bob);
    }

    #[tokio::test]
    async fn test_unregister_without_room() {
        // テスト項目: Room に参加していない接続の登録解除は None を返す
        // given (前提条件):
        let gateway = WebSocketMembershipGateway::new();
        let (alice, _rx) = connect(&gateway, "alice", 1000).await;

        // when (操作):
        let left = gateway.unregister_connection(alice).await;

        // then (期待する結果):
        assert_eq!(left, None);
        assert!(gateway.occupied_rooms().await.is_empty());
    }
}
