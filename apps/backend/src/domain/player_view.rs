//! Player view of session state - what information is visible to a player.
//!
//! Every outbound payload that differs per recipient is produced here from
//! `(session, recipient)`. Call sites never branch on roles themselves.

use serde::Serialize;

use crate::domain::deck::{SelectionStep, Token};
use crate::domain::role_assignment::KnownAlly;
use crate::domain::roles::{Role, Team};
use crate::domain::roster::{Player, PlayerId};
use crate::domain::state::{Phase, SessionState};
use crate::domain::tally::VoteResult;
use crate::domain::turn::TurnStatus;
use crate::domain::win::GameOverReason;

/// Public identity of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

impl From<&Player> for PlayerRef {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
}

impl From<&Player> for PlayerSummary {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            alive: p.alive,
        }
    }
}

/// A player with their role revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub role: Option<Role>,
    pub alive: bool,
}

impl From<&Player> for RevealedPlayer {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            role: p.role,
            alive: p.alive,
        }
    }
}

/// Private role briefing sent once at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleBriefing {
    pub role: Role,
    pub team: Team,
    pub known_allies: Vec<KnownAlly>,
}

/// Public counters, broadcast on every phase entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStateView {
    pub phase: Phase,
    pub round: u32,
    pub good_deeds: u32,
    pub evil_deeds: u32,
    pub current_turn_index: usize,
    pub current_turn_status: TurnStatus,
    pub turn_order: Vec<PlayerSummary>,
}

/// Phase entry as seen by one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseView {
    pub phase: Phase,
    pub round: u32,
    pub leader: Option<PlayerRef>,
    pub proposed_executor: Option<PlayerRef>,
    pub step: Option<SelectionStep>,
    pub is_my_turn: bool,
    /// Visible only to the player currently removing a token.
    pub tokens: Option<Vec<Token>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnSlotView {
    pub index: usize,
    pub player: PlayerSummary,
    pub is_current: bool,
    pub status: TurnStatus,
    pub proposed_executor: Option<PlayerRef>,
    pub vote_result: Option<VoteResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOrderView {
    pub turn_order: Vec<TurnSlotView>,
    pub current_turn_index: usize,
    pub round: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub total_rounds: u32,
    pub good_deeds: u32,
    pub evil_deeds: u32,
    pub players_killed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub winner: Team,
    pub reason: GameOverReason,
    pub players: Vec<RevealedPlayer>,
    pub stats: GameStats,
    pub room_code: String,
}

/// The player currently holding token-removal authority.
pub fn token_actor(state: &SessionState) -> Option<PlayerId> {
    if state.phase != Phase::CardSelection {
        return None;
    }
    match state.deck.as_ref()?.step()? {
        SelectionStep::Leader => state.leader_id(),
        SelectionStep::Executor => state.proposed_executor,
    }
}

pub fn role_briefing(state: &SessionState, recipient: PlayerId) -> Option<RoleBriefing> {
    let role = state.roster.get(recipient)?.role?;
    Some(RoleBriefing {
        role,
        team: role.team(),
        known_allies: state.assignment.known_allies(recipient).to_vec(),
    })
}

pub fn phase_view(state: &SessionState, recipient: PlayerId) -> PhaseView {
    let recipient_alive = state.roster.is_alive(recipient);
    let step = match state.phase {
        Phase::CardSelection => state.deck.as_ref().and_then(|d| d.step()),
        _ => None,
    };

    let is_my_turn = match state.phase {
        Phase::Nomination => state.is_leader(recipient),
        Phase::Voting => recipient_alive,
        Phase::CardSelection => token_actor(state) == Some(recipient),
        Phase::Kill => state.can_kill && state.is_leader(recipient),
        Phase::GodGuess => {
            recipient_alive && state.roster.get(recipient).is_some_and(Player::is_conspiracy)
        }
        Phase::Waiting | Phase::TurnTransition | Phase::GameOver => false,
    };

    let tokens = match state.phase {
        Phase::CardSelection if is_my_turn => state.deck.as_ref().map(|d| d.tokens().to_vec()),
        _ => None,
    };

    PhaseView {
        phase: state.phase,
        round: state.round,
        leader: state.leader().map(PlayerRef::from),
        proposed_executor: state.executor().map(PlayerRef::from),
        step,
        is_my_turn,
        tokens,
    }
}

pub fn game_state_view(state: &SessionState) -> GameStateView {
    GameStateView {
        phase: state.phase,
        round: state.round,
        good_deeds: state.good_deeds,
        evil_deeds: state.evil_deeds,
        current_turn_index: state.current_turn_index,
        current_turn_status: state.current_turn_status(),
        turn_order: state
            .turn_order
            .ids()
            .iter()
            .filter_map(|id| state.roster.get(*id))
            .map(PlayerSummary::from)
            .collect(),
    }
}

/// Per-slot status, showing the latest record for each turn-order slot.
pub fn turn_order_view(state: &SessionState) -> TurnOrderView {
    let turn_order = state
        .turn_order
        .ids()
        .iter()
        .enumerate()
        .filter_map(|(index, id)| {
            let player = state.roster.get(*id)?;
            let record = state.history.latest_for_index(index);
            Some(TurnSlotView {
                index,
                player: PlayerSummary::from(player),
                is_current: index == state.current_turn_index,
                status: record.map(|r| r.status).unwrap_or(TurnStatus::Pending),
                proposed_executor: record
                    .and_then(|r| r.proposed_executor)
                    .and_then(|id| state.roster.get(id))
                    .map(PlayerRef::from),
                vote_result: record.and_then(|r| r.vote_result),
            })
        })
        .collect();

    TurnOrderView {
        turn_order,
        current_turn_index: state.current_turn_index,
        round: state.round,
    }
}

pub fn player_list(state: &SessionState) -> Vec<PlayerSummary> {
    state.roster.players().iter().map(PlayerSummary::from).collect()
}

pub fn game_over_summary(state: &SessionState, reason: GameOverReason) -> GameOverSummary {
    GameOverSummary {
        winner: reason.winner(),
        reason,
        players: state.roster.players().iter().map(RevealedPlayer::from).collect(),
        stats: GameStats {
            total_rounds: state.round,
            good_deeds: state.good_deeds,
            evil_deeds: state.evil_deeds,
            players_killed: state.casualties.len(),
        },
        room_code: state.room_code.clone(),
    }
}
