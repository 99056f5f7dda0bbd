//! Configuration: game constants and process settings.

pub mod game;
pub mod server;

pub use game::{DeckConfig, GameConfig, PhaseDeadlines, RoleCounts};
pub use server::ServerConfig;
