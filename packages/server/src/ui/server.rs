//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::ServerConfig, usecase::EvictRoomsUseCase};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket playback sync server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, app_state, evict_rooms_usecase);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    app_state: Arc<AppState>,
    /// EvictRoomsUseCase（定期掃除に使用）
    evict_rooms_usecase: Arc<EvictRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        config: ServerConfig,
        app_state: AppState,
        evict_rooms_usecase: Arc<EvictRoomsUseCase>,
    ) -> Self {
        Self {
            config,
            app_state: Arc::new(app_state),
            evict_rooms_usecase,
        }
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Playback sync server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?name=<display name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper = self.config.room_ttl.map(|ttl| {
            spawn_sweeper(
                self.evict_rooms_usecase.clone(),
                ttl,
                self.config.sweep_interval,
            )
        });

        let app = build_router(self.app_state, self.config.cors_origin.as_deref());
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        result
    }
}

fn build_router(app_state: Arc<AppState>, cors_origin: Option<&str>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS origin ({}), allowing any origin", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
}

fn spawn_sweeper(
    evict_rooms_usecase: Arc<EvictRoomsUseCase>,
    ttl: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tracing::info!(
        "Idle rooms are swept every {:?} (ttl {:?})",
        every,
        ttl
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            evict_rooms_usecase.sweep_idle(ttl).await;
        }
    })
}
