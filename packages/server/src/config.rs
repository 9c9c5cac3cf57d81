//! Server configuration.

use std::time::Duration;

/// What happens to a room's playback state once nobody is left in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RoomRetention {
    /// Keep the state for the lifetime of the process
    Keep,
    /// Drop the state when the last participant leaves
    #[default]
    EvictWhenEmpty,
}

/// Runtime configuration for [`crate::ui::Server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 5000)
    pub port: u16,
    pub retention: RoomRetention,
    /// Rooms without members whose last change is older than this are swept.
    /// `None` disables the sweep.
    pub room_ttl: Option<Duration>,
    /// How often the idle-room sweep runs
    pub sweep_interval: Duration,
    /// Allowed browser origin for the HTTP API. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            retention: RoomRetention::default(),
            room_ttl: None,
            sweep_interval: Duration::from_secs(60),
            cors_origin: None,
        }
    }
}
