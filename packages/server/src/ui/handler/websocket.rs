//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DisplayName, Timestamp},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};
use syncvia_shared::time::get_timestamp_millis;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Display name shown to the other participants
    pub name: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let display_name = match query.name {
        Some(name) => DisplayName::new(name).unwrap_or_else(|e| {
            tracing::warn!("Invalid display name ({}), using anonymous", e);
            DisplayName::anonymous()
        }),
        None => DisplayName::anonymous(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, display_name))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Messages queued by the membership gateway (broadcasts and unicasts) reach
/// this client in the order they were queued.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, display_name: DisplayName) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .gateway
        .register_connection(
            connection_id,
            display_name.clone(),
            Timestamp::new(get_timestamp_millis()),
            tx,
        )
        .await;
    tracing::info!(
        "Connection {} ({}) opened",
        connection_id,
        display_name.as_str()
    );

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&state_clone, connection_id, &text).await,
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Some(room_id) = state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await
    {
        tracing::info!("Connection {} left room '{}'", connection_id, room_id);
    }
    tracing::info!("Connection {} closed", connection_id);
}

/// Routes one inbound frame. Malformed frames are logged and dropped; the
/// sender never receives an error reply.
async fn dispatch(state: &AppState, connection_id: ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropping malformed message from {}: {}", connection_id, e);
            return;
        }
    };

    match message {
        ClientMessage::JoinRoom { room_id } => {
            if let Err(e) = state.join_room_usecase.execute(connection_id, room_id).await {
                tracing::warn!("join-room from {} rejected: {}", connection_id, e);
            }
        }
        ClientMessage::VideoStateChange {
            room_id,
            mode,
            timestamp,
        } => {
            match state
                .change_playback_state_usecase
                .execute(connection_id, room_id, mode.into(), timestamp)
                .await
            {
                Ok(report) => tracing::debug!(
                    "{:?} at {:.3}s from {} relayed to {} peer(s)",
                    report.state.mode,
                    report.state.position.seconds(),
                    connection_id,
                    report.delivered
                ),
                Err(e) => tracing::warn!("Dropping event from {}: {}", connection_id, e),
            }
        }
        ClientMessage::RequestRoomState { room_id } => {
            match state
                .recover_room_state_usecase
                .execute(connection_id, room_id)
                .await
            {
                Ok(Some(snapshot)) => tracing::debug!(
                    "Sent {:?} at {:.3}s to late joiner {}",
                    snapshot.mode,
                    snapshot.position.seconds(),
                    connection_id
                ),
                Ok(None) => {}
                Err(e) => tracing::warn!("request-room-state from {} failed: {}", connection_id, e),
            }
        }
    }
}
