//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ChangePlaybackStateUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinRoomUseCase, RecoverRoomStateUseCase,
};

use crate::domain::MembershipGateway;

/// Shared application state
pub struct AppState {
    /// MembershipGateway（接続の登録に使用）
    pub gateway: Arc<dyn MembershipGateway>,
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// ChangePlaybackStateUseCase（再生状態変更のユースケース）
    pub change_playback_state_usecase: Arc<ChangePlaybackStateUseCase>,
    /// RecoverRoomStateUseCase（途中参加者への状態復元のユースケース）
    pub recover_room_state_usecase: Arc<RecoverRoomStateUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
