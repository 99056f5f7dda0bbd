//! Outbound events and their audience.

use serde::Serialize;

use crate::domain::deck::{SelectionStep, Token};
use crate::domain::player_view::{
    GameOverSummary, GameStateView, PhaseView, PlayerRef, PlayerSummary, RevealedPlayer,
    RoleBriefing, TurnOrderView,
};
use crate::domain::roster::PlayerId;
use crate::domain::tally::VoteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every connected roster member.
    All,
    Only(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    WaitingForPlayers {
        current: usize,
        max: usize,
    },
    PlayerList {
        players: Vec<PlayerSummary>,
    },
    RoleAssigned(RoleBriefing),
    GameState(GameStateView),
    PhaseChange(PhaseView),
    TurnOrderUpdate(TurnOrderView),
    VoteResults(VoteResult),
    TokenRemoved {
        by: PlayerRef,
        step: SelectionStep,
        remaining: usize,
        timed_out: bool,
    },
    TokenRevealed {
        token: Token,
        good_deeds: u32,
        evil_deeds: u32,
    },
    /// Seer-only side channel.
    DemonDisclosed {
        demon: PlayerRef,
        disclosed: Vec<PlayerRef>,
    },
    PlayerKilled {
        player: RevealedPlayer,
        timed_out: bool,
    },
    GodGuessResults {
        guessed: Option<RevealedPlayer>,
        correct: bool,
        votes: usize,
        timed_out: bool,
    },
    TimerUpdate {
        remaining: u32,
    },
    GameOver(GameOverSummary),
    ChatMessage {
        from: String,
        message: String,
        timestamp_ms: i64,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::WaitingForPlayers { .. } => "waiting_for_players",
            GameEvent::PlayerList { .. } => "player_list",
            GameEvent::RoleAssigned(_) => "role_assigned",
            GameEvent::GameState(_) => "game_state",
            GameEvent::PhaseChange(_) => "phase_change",
            GameEvent::TurnOrderUpdate(_) => "turn_order_update",
            GameEvent::VoteResults(_) => "vote_results",
            GameEvent::TokenRemoved { .. } => "token_removed",
            GameEvent::TokenRevealed { .. } => "token_revealed",
            GameEvent::DemonDisclosed { .. } => "demon_disclosed",
            GameEvent::PlayerKilled { .. } => "player_killed",
            GameEvent::GodGuessResults { .. } => "god_guess_results",
            GameEvent::TimerUpdate { .. } => "timer_update",
            GameEvent::GameOver(_) => "game_over",
            GameEvent::ChatMessage { .. } => "chat_message",
        }
    }
}

/// One event addressed to its audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub audience: Audience,
    pub event: GameEvent,
}

impl Outbound {
    pub fn all(event: GameEvent) -> Self {
        Self {
            audience: Audience::All,
            event,
        }
    }

    pub fn only(id: PlayerId, event: GameEvent) -> Self {
        Self {
            audience: Audience::Only(id),
            event,
        }
    }

    pub fn is_for(&self, id: PlayerId) -> bool {
        match self.audience {
            Audience::All => true,
            Audience::Only(target) => target == id,
        }
    }
}
