//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use syncvia_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use tokio::{
    sync::{Mutex, mpsc},
    time::Instant,
};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use crate::{
    command::Command,
    error::ClientError,
    formatter::MessageFormatter,
    player::{LocalPlayer, SimulatedPlayer},
    reconciler::Reconciler,
};

use super::ui::{prompt_for, redisplay_prompt};

/// Reconciler shared by the read task and the input loop, kept across reconnects
pub type SharedReconciler = Arc<Mutex<Reconciler<SimulatedPlayer>>>;

/// Run one WebSocket session
///
/// Joins the room and requests its state once, then applies inbound events
/// and forwards prompt commands until the user quits (`Ok`) or the
/// connection fails (`Err`).
pub async fn run_client_session(
    url: &Url,
    name: &str,
    reconciler: &SharedReconciler,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let (handshake, room_id) = {
        let reconciler = reconciler.lock().await;
        (reconciler.handshake(), reconciler.room_id().to_string())
    };
    let prompt = prompt_for(name, &room_id);

    tracing::info!("Connected to sync server!");
    print!("{}", MessageFormatter::format_connected(name, &room_id));

    let (mut write, mut read) = ws_stream.split();

    for message in &handshake {
        write
            .send(encode(message)?)
            .await
            .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
    }

    // Spawn a task to handle incoming messages
    let reconciler_for_read = reconciler.clone();
    let prompt_for_read = prompt.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => {
                            let output = apply(&reconciler_for_read, message).await;
                            print!("{}", output);
                            redisplay_prompt(&prompt_for_read);
                        }
                        Err(e) => tracing::warn!("Ignoring unexpected message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return "closed by server".to_string();
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return e.to_string();
                }
                _ => {}
            }
        }
        "stream ended".to_string()
    });

    let input_loop = async {
        while let Some(line) = input_rx.recv().await {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };

            match command {
                Command::Quit => return Ok(()),
                Command::Status => {
                    let reconciler = reconciler.lock().await;
                    let now = Instant::now();
                    print!(
                        "{}",
                        MessageFormatter::format_status(
                            reconciler.player().mode(),
                            reconciler.player().current_time(now),
                            !reconciler.gate().is_idle(now),
                        )
                    );
                }
                Command::Action(action) => {
                    let outbound = reconciler
                        .lock()
                        .await
                        .on_local_action(action, Instant::now());
                    print!(
                        "{}",
                        MessageFormatter::format_local_action(action, outbound.is_some())
                    );
                    if let Some(message) = outbound {
                        write
                            .send(encode(&message)?)
                            .await
                            .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
                    }
                }
            }
        }
        // Ctrl+C / Ctrl+D on the prompt
        Ok::<(), ClientError>(())
    };

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            let reason = read_result.unwrap_or_else(|e| e.to_string());
            Err(ClientError::ConnectionLost(reason))
        }
        input_result = input_loop => {
            read_task.abort();
            input_result
        }
    }
}

/// Apply one server event to the reconciler and render it
async fn apply(reconciler: &SharedReconciler, message: ServerMessage) -> String {
    match message {
        ServerMessage::ParticipantJoined {
            participant_id,
            display_name,
        } => MessageFormatter::format_participant_joined(&display_name, &participant_id),
        ServerMessage::ParticipantLeft { participant_id } => {
            MessageFormatter::format_participant_left(&participant_id)
        }
        ServerMessage::VideoStateUpdate { mode, timestamp } => {
            let correction = reconciler
                .lock()
                .await
                .apply_remote(mode.into(), timestamp, Instant::now());
            MessageFormatter::format_remote_state("update", mode.into(), timestamp, &correction)
        }
        // A zero position is a valid state and is applied like any other
        ServerMessage::RoomStateResponse { mode, timestamp } => {
            let correction = reconciler
                .lock()
                .await
                .apply_remote(mode.into(), timestamp, Instant::now());
            MessageFormatter::format_remote_state("snapshot", mode.into(), timestamp, &correction)
        }
    }
}

/// Server URL with the display name as the `name` query parameter
pub fn connect_url(base: &str, name: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

fn encode(message: &ClientMessage) -> Result<Message, ClientError> {
    Ok(Message::text(serde_json::to_string(message)?))
}
