//! Roster membership before and during a game.

use serde::Serialize;
use tracing::{debug, info};

use super::timer::TimerKind;
use super::GameFlow;
use crate::domain::events::GameEvent;
use crate::domain::player_view::player_list;
use crate::domain::roster::{PlayerId, RosterFill};
use crate::errors::domain::DomainError;

pub const MAX_CHAT_CHARS: usize = 500;

/// Listing entry for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub room_code: String,
    pub host_name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub started: bool,
}

impl RoomSummary {
    pub fn is_joinable(&self) -> bool {
        !self.started && self.player_count < self.max_players
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Removed from the roster before the game started.
    Removed,
    /// Game in progress; the player stays in the roster, disconnected.
    Disconnected,
    /// Nobody is left; the session was torn down.
    TornDown,
    NotInRoom,
}

impl GameFlow {
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_code: self.state.room_code.clone(),
            host_name: self.state.host_name.clone(),
            player_count: self.state.roster.len(),
            max_players: self.state.roster.capacity(),
            started: self.state.roster.is_started(),
        }
    }

    /// Seat a player. Filling the roster arms the delayed game start.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Result<RosterFill, DomainError> {
        let fill = self.state.roster.add(id, name)?;
        info!(room_code = %self.state.room_code, player_id = %id, name, ?fill, "Player joined");

        self.emit_roster_update();
        if fill == RosterFill::Full {
            self.timer
                .arm(TimerKind::GameStart, self.config.deadlines.start_delay_secs);
        }
        Ok(fill)
    }

    pub fn leave(&mut self, id: PlayerId) -> LeaveOutcome {
        if !self.state.roster.contains(id) {
            return LeaveOutcome::NotInRoom;
        }

        let outcome = if self.state.roster.is_started() {
            self.state.roster.set_connected(id, false);
            if self.state.roster.connected_count() == 0 {
                LeaveOutcome::TornDown
            } else {
                LeaveOutcome::Disconnected
            }
        } else {
            self.state.roster.remove(id);
            if self.state.roster.is_empty() {
                LeaveOutcome::TornDown
            } else {
                LeaveOutcome::Removed
            }
        };

        info!(room_code = %self.state.room_code, player_id = %id, ?outcome, "Player left");
        match outcome {
            LeaveOutcome::TornDown => self.teardown(),
            LeaveOutcome::Removed => self.emit_roster_update(),
            LeaveOutcome::Disconnected | LeaveOutcome::NotInRoom => {}
        }
        outcome
    }

    /// Relay a chat line from a seated player. Blank lines are dropped.
    pub fn chat(&mut self, from: PlayerId, message: &str, timestamp_ms: i64) -> bool {
        let Some(player) = self.state.roster.get(from) else {
            debug!(room_code = %self.state.room_code, player_id = %from, "Chat from non-member dropped");
            return false;
        };
        let message = message.trim();
        if message.is_empty() {
            return false;
        }
        let message: String = message.chars().take(MAX_CHAT_CHARS).collect();
        let from = player.name.clone();
        self.broadcast(GameEvent::ChatMessage {
            from,
            message,
            timestamp_ms,
        });
        true
    }

    fn emit_roster_update(&mut self) {
        self.broadcast(GameEvent::WaitingForPlayers {
            current: self.state.roster.len(),
            max: self.state.roster.capacity(),
        });
        let players = player_list(&self.state);
        self.broadcast(GameEvent::PlayerList { players });
    }
}
