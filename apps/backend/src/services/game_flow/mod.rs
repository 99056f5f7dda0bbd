//! Session engine: the phase state machine for one game.
//!
//! `GameFlow` owns the session state, its RNG and its single deadline. It is
//! driven from outside by three inputs only: lobby calls (`join`, `leave`,
//! `chat`), participant actions (`apply`) and a 1 Hz clock (`tick`). Every
//! call runs to completion and queues its outbound effects, which the owner
//! collects with `drain`.

mod lifecycle;
mod lobby;
mod player_actions;
pub mod timer;
mod timeouts;

use std::sync::Arc;

use crate::config::GameConfig;
use crate::domain::events::{GameEvent, Outbound};
use crate::domain::player_view::{game_state_view, phase_view, turn_order_view};
use crate::domain::roster::PlayerId;
use crate::domain::seed_derivation::{session_rng, SessionRng};
use crate::domain::state::SessionState;
pub use lobby::{LeaveOutcome, RoomSummary};
pub use timer::{PhaseTimer, TimerKind};

/// Typed participant action, tagged with its origin by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Nominate { target: PlayerId },
    Vote { approve: bool },
    SelectToken { position: usize },
    Kill { target: PlayerId },
    GuessGod { target: PlayerId },
}

/// Why an action was dropped. Never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    WrongPhase,
    UnknownPlayer,
    DeadActor,
    NotLeader,
    NotTokenHolder,
    NotConspiracy,
    NoKillPermission,
    SelfNomination,
    InvalidTarget,
    PositionOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// Side effects queued for the session owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    Emit(Outbound),
    /// The session is finished or abandoned; drop it.
    Teardown,
}

pub struct GameFlow {
    config: Arc<GameConfig>,
    state: SessionState,
    rng: SessionRng,
    timer: PhaseTimer,
    effects: Vec<FlowEffect>,
    torn_down: bool,
}

impl GameFlow {
    /// New session in the waiting phase. `seed` makes every random choice reproducible.
    pub fn new(
        room_code: impl Into<String>,
        host_name: impl Into<String>,
        config: Arc<GameConfig>,
        seed: Option<u64>,
    ) -> Self {
        let state = SessionState::new(room_code, host_name, config.roster_capacity);
        Self {
            config,
            state,
            rng: session_rng(seed),
            timer: PhaseTimer::new(),
            effects: Vec::new(),
            torn_down: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn room_code(&self) -> &str {
        &self.state.room_code
    }

    /// Currently armed deadline, if any.
    pub fn armed_timer(&self) -> Option<timer::Deadline> {
        self.timer.armed()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Take every effect queued since the last drain, in emission order.
    pub fn drain(&mut self) -> Vec<FlowEffect> {
        std::mem::take(&mut self.effects)
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    fn emit(&mut self, outbound: Outbound) {
        self.effects.push(FlowEffect::Emit(outbound));
    }

    fn broadcast(&mut self, event: GameEvent) {
        self.emit(Outbound::all(event));
    }

    fn emit_game_state(&mut self) {
        let view = game_state_view(&self.state);
        self.broadcast(GameEvent::GameState(view));
    }

    fn emit_turn_order(&mut self) {
        let view = turn_order_view(&self.state);
        self.broadcast(GameEvent::TurnOrderUpdate(view));
    }

    /// Phase entry, projected per recipient.
    fn emit_phase_change(&mut self) {
        let recipients: Vec<PlayerId> = self.state.roster.players().iter().map(|p| p.id).collect();
        for id in recipients {
            let view = phase_view(&self.state, id);
            self.emit(Outbound::only(id, GameEvent::PhaseChange(view)));
        }
    }

    fn teardown(&mut self) {
        self.timer.cancel();
        if !self.torn_down {
            self.torn_down = true;
            self.effects.push(FlowEffect::Teardown);
        }
    }
}
