//! Playback sync server.
//!
//! Keeps one playback state per room and relays play/pause/seek changes to
//! everyone else in the room. Late joiners ask for the current state with
//! `request-room-state`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin syncvia-server
//! cargo run --bin syncvia-server -- --host 0.0.0.0 --port 5000 --room-ttl-secs 3600
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use syncvia_server::{
    config::{RoomRetention, ServerConfig},
    infrastructure::{membership::WebSocketMembershipGateway, repository::InMemoryRoomRegistry},
    ui::{Server, state::AppState},
    usecase::{
        ChangePlaybackStateUseCase, DisconnectParticipantUseCase, EvictRoomsUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, RecoverRoomStateUseCase,
    },
};
use syncvia_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "syncvia-server")]
#[command(about = "WebSocket playback sync server for watch parties", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "SYNCVIA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "SYNCVIA_PORT", default_value = "5000")]
    port: u16,

    /// What to do with a room's playback state once it is empty
    #[arg(long, value_enum, default_value_t = RoomRetention::EvictWhenEmpty)]
    retention: RoomRetention,

    /// Sweep rooms with no participants whose last change is older than this
    #[arg(long)]
    room_ttl_secs: Option<u64>,

    /// Seconds between idle-room sweeps
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: u64,

    /// Browser origin allowed to call the HTTP API (any origin when unset)
    #[arg(long, env = "SYNCVIA_FRONTEND_URL")]
    cors_origin: Option<String>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            retention: args.retention,
            room_ttl: args.room_ttl_secs.map(Duration::from_secs),
            sweep_interval: Duration::from_secs(args.sweep_interval_secs),
            cors_origin: args.cors_origin,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::info!("Room retention: {:?}", config.retention);

    // Initialize dependencies in order:
    // 1. Registry
    // 2. Gateway
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create Registry (in-memory playback state per room)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create Gateway (WebSocket implementation)
    let gateway = Arc::new(WebSocketMembershipGateway::new());

    // 3. Create UseCases
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let evict_rooms_usecase = Arc::new(EvictRoomsUseCase::new(
        registry.clone(),
        gateway.clone(),
        clock.clone(),
        config.retention,
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        gateway.clone(),
        evict_rooms_usecase.clone(),
    ));
    let change_playback_state_usecase = Arc::new(ChangePlaybackStateUseCase::new(
        registry.clone(),
        gateway.clone(),
        clock.clone(),
        evict_rooms_usecase.clone(),
    ));
    let recover_room_state_usecase = Arc::new(RecoverRoomStateUseCase::new(
        registry.clone(),
        gateway.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        gateway.clone(),
        evict_rooms_usecase.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(
        registry.clone(),
        gateway.clone(),
        clock.clone(),
    ));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(
        registry.clone(),
        gateway.clone(),
        clock,
    ));

    // 4. Create AppState
    let app_state = AppState {
        gateway,
        join_room_usecase,
        change_playback_state_usecase,
        recover_room_state_usecase,
        disconnect_participant_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    };

    // 5. Create and run the server
    let server = Server::new(config, app_state, evict_rooms_usecase);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
