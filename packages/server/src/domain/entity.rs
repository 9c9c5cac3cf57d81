//! エンティティ
//!
//! - `PlaybackState`: Room ごとの最新の再生状態（Room Registry が所有）
//! - `Participant`: Room に参加中の接続（Membership Gateway が所有）

use syncvia_shared::time::elapsed_seconds;

use super::value_object::{ConnectionId, DisplayName, PlaybackPosition, Timestamp};

/// 再生モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    Playing,
    Paused,
}

/// Room の再生状態
///
/// 最後に受理された変更のみを保持します（履歴なし、latest-wins）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    pub position: PlaybackPosition,
    /// サーバーが変更を受理した時刻。外挿にのみ使用し、クライアントの時計とは無関係。
    pub observed_at: Timestamp,
}

impl PlaybackState {
    pub fn new(mode: PlaybackMode, position: PlaybackPosition, observed_at: Timestamp) -> Self {
        Self {
            mode,
            position,
            observed_at,
        }
    }

    /// `now` 時点の再生位置を推定する
    ///
    /// - `Playing`: 受理時刻からの経過秒数を加算（途中のバッファリング等は考慮しない）
    /// - `Paused`: 記録された位置のまま
    pub fn extrapolate(&self, now: Timestamp) -> PlaybackPosition {
        match self.mode {
            PlaybackMode::Playing => self
                .position
                .advanced_by(elapsed_seconds(self.observed_at.value(), now.value())),
            PlaybackMode::Paused => self.position,
        }
    }
}

/// Room の参加者（接続ごとに一時的に存在する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub display_name: DisplayName,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, display_name: DisplayName, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            connected_at,
        }
    }
}
