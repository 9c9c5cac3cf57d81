//! Repository trait 定義
//!
//! ドメイン層が必要とする再生状態ストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{
    entity::PlaybackState,
    value_object::{RoomId, Timestamp},
};

/// Room 1 つ分の再生状態スロットのロック
///
/// 保持している間、同じ Room への他の書き込み・読み取りは待たされます。
/// read-modify-write をアトミックに行うために使用します。
pub type PlaybackSlot = OwnedMutexGuard<Option<PlaybackState>>;

/// Room Registry trait
///
/// Room ID から最新の `PlaybackState` への、プロセス全体で唯一のマッピング。
/// 永続化はしません（プロセスの寿命 = 状態の寿命）。
///
/// ## 並行性
///
/// - 異なる Room への操作は互いにブロックしない
/// - 同じ Room への操作は Room ごとのロックで直列化される
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 再生状態を取得（存在しない Room に対してスロットを作成しない）
    async fn get(&self, room_id: &RoomId) -> Option<PlaybackState>;

    /// 再生状態を上書き（latest-wins）
    async fn set(&self, room_id: &RoomId, state: PlaybackState);

    /// Room のスロットをロックして返す（存在しなければ空のスロットを作成）
    async fn lock(&self, room_id: &RoomId) -> PlaybackSlot;

    /// Room の再生状態を破棄し、破棄した値を返す
    async fn remove(&self, room_id: &RoomId) -> Option<PlaybackState>;

    /// ロック済みのスロットを空にしてから Room を破棄し、破棄した値を返す
    ///
    /// 呼び出し側はロックを保持したまま破棄の条件（参加者がいない等）を確認できます。
    /// このスロットを待っていた書き込みは、破棄後に作成される新しいスロットに書き込まれます。
    async fn evict(&self, room_id: &RoomId, slot: PlaybackSlot) -> Option<PlaybackState>;

    /// 状態が `observed_before` より前に受理されたものであれば破棄する
    ///
    /// 判定と破棄は Room のロック内で行うため、並行して書き込まれた新しい状態は破棄しません。
    async fn remove_stale(&self, room_id: &RoomId, observed_before: Timestamp) -> bool;

    /// 状態を持つ全ての Room を取得
    async fn rooms(&self) -> Vec<(RoomId, PlaybackState)>;
}
