//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{GatewayError, ValueObjectError};

/// Room 参加時のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoinRoomError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(ValueObjectError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// 再生状態の変更時のエラー
///
/// 送信者には通知されません（サーバー側でログに残して破棄するのみ）。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChangePlaybackStateError {
    #[error("malformed video-state-change: {0}")]
    MalformedEvent(ValueObjectError),
}

/// 途中参加者への状態復元時のエラー
///
/// Room に状態がないことはエラーではありません（`Ok(None)`）。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecoverRoomStateError {
    #[error("malformed request-room-state: {0}")]
    MalformedEvent(ValueObjectError),

    #[error("failed to deliver room state: {0}")]
    Unicast(GatewayError),
}

/// Room 詳細取得時のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(ValueObjectError),

    #[error("room not found")]
    RoomNotFound,
}
