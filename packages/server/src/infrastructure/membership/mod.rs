//! Room メンバーシップ（マルチキャストグループ）の実装
//!
//! ## 実装
//!
//! - `websocket`: WebSocket 接続の `UnboundedSender` を使った実装

pub mod websocket;

pub use websocket::WebSocketMembershipGateway;
