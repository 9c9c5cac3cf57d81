//! Domain 層
//!
//! 再生同期のビジネスルール（値オブジェクト、エンティティ、外部への送信イベント）と、
//! ドメイン層が必要とするインターフェース（`RoomRegistry`, `MembershipGateway`）を定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod event;
pub mod gateway;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, PlaybackMode, PlaybackState};
pub use error::{GatewayError, ValueObjectError};
pub use event::OutboundEvent;
pub use gateway::{JoinedRoom, MembershipGateway, PusherChannel};
pub use repository::{PlaybackSlot, RoomRegistry};
pub use value_object::{ConnectionId, DisplayName, PlaybackPosition, RoomId, Timestamp};

#[cfg(test)]
pub use gateway::MockMembershipGateway;
