//! UseCase 層
//!
//! Room Registry（再生状態）と Membership Gateway（接続と Room の対応）を仲介し、
//! 再生同期の各操作を実装します。

mod change_playback_state;
mod disconnect_participant;
mod error;
mod evict_rooms;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod recover_room_state;

pub use change_playback_state::{ChangePlaybackStateUseCase, StateChangeReport};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ChangePlaybackStateError, GetRoomDetailError, JoinRoomError, RecoverRoomStateError,
};
pub use evict_rooms::EvictRoomsUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::{GetRoomsUseCase, RoomOverview};
pub use join_room::JoinRoomUseCase;
pub use recover_room_state::{RecoverRoomStateUseCase, RoomSnapshot};
