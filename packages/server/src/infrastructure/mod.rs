//! Infrastructure 層
//!
//! - `dto`: ワイヤーフォーマット（WebSocket / HTTP）
//! - `repository`: `RoomRegistry` の実装
//! - `membership`: `MembershipGateway` の実装

pub mod dto;
pub mod membership;
pub mod repository;
