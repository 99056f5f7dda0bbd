use std::sync::Arc;

use crate::config::{GameConfig, ServerConfig};
use crate::ws::hub::SessionRegistry;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Live rooms, keyed by room code
    pub registry: Arc<SessionRegistry>,
    /// Game constants every room is created with
    pub config: Arc<GameConfig>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(config: GameConfig, server: ServerConfig) -> Self {
        let config = Arc::new(config);
        let registry = SessionRegistry::new(config.clone(), server.seed);
        Self {
            registry,
            config,
            server,
        }
    }

    /// Short deadlines and a fixed seed.
    pub fn for_tests() -> Self {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            seed: Some(7),
        };
        Self::new(GameConfig::for_tests(), server)
    }
}
