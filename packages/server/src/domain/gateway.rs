//! MembershipGateway trait 定義
//!
//! 接続と Room の対応関係（マルチキャストグループ）を管理し、
//! join / broadcast / unicast のプリミティブを上位層に提供します。
//!
//! ## 配信の保証
//!
//! - at-most-once、ACK なし、リトライなし
//! - broadcast は送信時点のメンバーにのみ届く（後から参加した接続には届かない）
//! - 接続ごとの FIFO 順序はトランスポート（WebSocket）に依存

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::Participant,
    error::GatewayError,
    event::OutboundEvent,
    value_object::{ConnectionId, DisplayName, RoomId, Timestamp},
};

/// クライアントへのメッセージ送信チャンネル（エンコード済み JSON）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// join の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    /// Room に参加した参加者
    pub participant: Participant,
    /// 直前まで所属していた別の Room（移動した場合のみ）
    pub previous_room: Option<RoomId>,
    /// すでに同じ Room に参加済みだった場合は `true`
    pub already_member: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipGateway: Send + Sync {
    /// 接続を登録（まだどの Room にも所属しない）
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        connected_at: Timestamp,
        sender: PusherChannel,
    );

    /// 接続を登録解除し、所属していた Room を返す
    async fn unregister_connection(&self, connection_id: ConnectionId) -> Option<RoomId>;

    /// 接続を Room のグループに追加（1 接続 = 1 Room。別の Room に所属していれば移動）
    async fn join(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> Result<JoinedRoom, GatewayError>;

    /// Room に所属している参加者一覧（接続時刻順）
    async fn members(&self, room_id: RoomId) -> Vec<Participant>;

    /// 参加者が 1 人以上いる全ての Room
    async fn occupied_rooms(&self) -> Vec<RoomId>;

    /// Room の全メンバー（`exclude` を除く）にイベントを送信し、送信できた数を返す
    async fn broadcast(
        &self,
        room_id: RoomId,
        event: OutboundEvent,
        exclude: Option<ConnectionId>,
    ) -> Result<usize, GatewayError>;

    /// 1 つの接続にのみイベントを送信
    async fn unicast(
        &self,
        connection_id: ConnectionId,
        event: OutboundEvent,
    ) -> Result<(), GatewayError>;
}
