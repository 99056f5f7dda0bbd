//! Application services.

pub mod game_flow;
