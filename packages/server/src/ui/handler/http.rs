//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{
        ParticipantDetailDto, PlaybackStateDto, RoomDetailDto, RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::{GetRoomDetailError, RoomOverview},
};
use syncvia_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.display_name.as_str().to_string())
                .collect(),
            state: playback_state_dto(&room),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                participants: room
                    .participants
                    .iter()
                    .map(|p| ParticipantDetailDto {
                        participant_id: p.id.to_string(),
                        display_name: p.display_name.as_str().to_string(),
                        connected_at: timestamp_to_rfc3339(p.connected_at.value()),
                    })
                    .collect(),
                state: playback_state_dto(&room),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::InvalidRoomId(_)) => Err(StatusCode::BAD_REQUEST),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

fn playback_state_dto(room: &RoomOverview) -> Option<PlaybackStateDto> {
    let state = room.state?;
    Some(PlaybackStateDto {
        mode: state.mode.into(),
        position_seconds: state.position.seconds(),
        current_position_seconds: room
            .current_position
            .unwrap_or(state.position)
            .seconds(),
        observed_at: timestamp_to_rfc3339(state.observed_at.value()),
    })
}
