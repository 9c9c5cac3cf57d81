//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクト生成時の検証エラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    /// Room ID が空
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// Room ID が長すぎる
    #[error("room id is too long ({0} chars, max {max})", max = super::value_object::RoomId::MAX_LEN)]
    RoomIdTooLong(usize),

    /// 表示名が空または長すぎる
    #[error("invalid display name: {0:?}")]
    InvalidDisplayName(String),

    /// 再生位置が負の値
    #[error("playback position must be >= 0, got {0}")]
    NegativePosition(f64),

    /// 再生位置が有限値ではない（NaN / Infinity）
    #[error("playback position must be a finite number")]
    NonFinitePosition,
}

/// MembershipGateway のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// 接続が登録されていない
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),

    /// 送信チャンネルへの push に失敗（受信側が切断済み）
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// イベントのシリアライズに失敗
    #[error("failed to encode event: {0}")]
    Encode(String),
}
