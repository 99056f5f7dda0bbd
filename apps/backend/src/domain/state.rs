//! Session state owned by one running game.

use serde::Serialize;

use crate::domain::deck::Deck;
use crate::domain::role_assignment::RoleAssignment;
use crate::domain::roster::{Player, PlayerId, Roster};
use crate::domain::tally::{GuessTally, VoteTally};
use crate::domain::turn::{TurnHistory, TurnOrder, TurnStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Nomination,
    Voting,
    CardSelection,
    Kill,
    GodGuess,
    /// Settle delay between a resolved turn and the next nomination.
    TurnTransition,
    GameOver,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Nomination => "nomination",
            Phase::Voting => "voting",
            Phase::CardSelection => "card_selection",
            Phase::Kill => "kill",
            Phase::GodGuess => "god_guess",
            Phase::TurnTransition => "turn_transition",
            Phase::GameOver => "game_over",
        }
    }

    /// Phases in which participant actions can be accepted.
    pub const fn accepts_actions(self) -> bool {
        matches!(
            self,
            Phase::Nomination | Phase::Voting | Phase::CardSelection | Phase::Kill | Phase::GodGuess
        )
    }
}

/// Everything one session knows.
///
/// Mutated only by the session engine, one action or tick at a time.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub room_code: String,
    pub host_name: String,
    pub roster: Roster,
    pub phase: Phase,
    pub turn_order: TurnOrder,
    /// Always indexes a living entry of `turn_order` once the game started.
    pub current_turn_index: usize,
    pub round: u32,
    pub deck: Option<Deck>,
    pub good_deeds: u32,
    pub evil_deeds: u32,
    pub completed_turns: u32,
    pub disclosed_demons: Vec<PlayerId>,
    pub casualties: Vec<PlayerId>,
    pub history: TurnHistory,
    pub votes: VoteTally,
    pub guesses: GuessTally,
    /// One-shot kill permission for the current leader.
    pub can_kill: bool,
    pub proposed_executor: Option<PlayerId>,
    pub assignment: RoleAssignment,
}

impl SessionState {
    pub fn new(room_code: impl Into<String>, host_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            room_code: room_code.into(),
            host_name: host_name.into(),
            roster: Roster::new(capacity),
            phase: Phase::Waiting,
            turn_order: TurnOrder::default(),
            current_turn_index: 0,
            round: 1,
            deck: None,
            good_deeds: 0,
            evil_deeds: 0,
            completed_turns: 0,
            disclosed_demons: Vec::new(),
            casualties: Vec::new(),
            history: TurnHistory::new(),
            votes: VoteTally::new(),
            guesses: GuessTally::new(),
            can_kill: false,
            proposed_executor: None,
            assignment: RoleAssignment::default(),
        }
    }

    pub fn leader_id(&self) -> Option<PlayerId> {
        self.turn_order.at(self.current_turn_index)
    }

    pub fn leader(&self) -> Option<&Player> {
        self.leader_id().and_then(|id| self.roster.get(id))
    }

    pub fn executor(&self) -> Option<&Player> {
        self.proposed_executor.and_then(|id| self.roster.get(id))
    }

    pub fn is_leader(&self, id: PlayerId) -> bool {
        self.leader_id() == Some(id)
    }

    pub fn current_turn_status(&self) -> TurnStatus {
        match self.phase {
            Phase::Waiting | Phase::TurnTransition => TurnStatus::Pending,
            _ => self
                .history
                .current()
                .map(|r| r.status)
                .unwrap_or(TurnStatus::Pending),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
