//! Domain layer: pure session logic types and helpers.

pub mod deck;
pub mod events;
pub mod player_view;
pub mod role_assignment;
pub mod roles;
pub mod roster;
pub mod seed_derivation;
pub mod shuffle;
pub mod state;
pub mod tally;
pub mod turn;
pub mod win;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_deck;
#[cfg(test)]
mod tests_props_roles;
#[cfg(test)]
mod tests_props_tally;

// Re-exports for ergonomics
pub use deck::{Deck, SelectionStep, Token};
pub use events::{Audience, GameEvent, Outbound};
pub use roles::{Role, Team};
pub use roster::{Player, PlayerId, Roster, RosterFill};
pub use state::{Phase, SessionState};
pub use win::{GameOverReason, WinCheck};
