//! Participant actions.
//!
//! Wrong-phase, wrong-actor and bad-target actions are dropped without a
//! reply; the returned `ActionOutcome` exists for logs and tests only.

use tracing::debug;

use super::{ActionOutcome, GameFlow, IgnoreReason, PlayerAction};
use crate::domain::deck::Removal;
use crate::domain::events::GameEvent;
use crate::domain::player_view::{token_actor, PlayerRef};
use crate::domain::roster::PlayerId;
use crate::domain::state::Phase;
use crate::errors::domain::DomainError;

use super::ActionOutcome::{Applied, Ignored};

impl GameFlow {
    /// Apply one action from `actor`. An `Err` is an invariant violation and
    /// has already torn the session down.
    pub fn apply(&mut self, actor: PlayerId, action: PlayerAction) -> Result<ActionOutcome, DomainError> {
        let result = match action {
            PlayerAction::Nominate { target } => self.nominate(actor, target),
            PlayerAction::Vote { approve } => self.vote(actor, approve),
            PlayerAction::SelectToken { position } => self.select_token(actor, position, false),
            PlayerAction::Kill { target } => self.kill(actor, target, false),
            PlayerAction::GuessGod { target } => self.guess_god(actor, target),
        };

        match result {
            Ok(Ignored(reason)) => {
                debug!(
                    room_code = %self.state.room_code,
                    player_id = %actor,
                    phase = self.state.phase.as_str(),
                    ?action,
                    ?reason,
                    "Action dropped"
                );
                Ok(Ignored(reason))
            }
            Ok(Applied) => Ok(Applied),
            Err(err) => {
                self.abort(&err);
                Err(err)
            }
        }
    }

    fn gate(&self, phase: Phase, actor: PlayerId) -> Option<IgnoreReason> {
        if self.state.phase != phase {
            return Some(IgnoreReason::WrongPhase);
        }
        match self.state.roster.get(actor) {
            None => Some(IgnoreReason::UnknownPlayer),
            Some(p) if !p.alive => Some(IgnoreReason::DeadActor),
            Some(_) => None,
        }
    }

    fn nominate(&mut self, actor: PlayerId, target: PlayerId) -> Result<ActionOutcome, DomainError> {
        if let Some(reason) = self.gate(Phase::Nomination, actor) {
            return Ok(Ignored(reason));
        }
        if !self.state.is_leader(actor) {
            return Ok(Ignored(IgnoreReason::NotLeader));
        }
        if target == actor {
            return Ok(Ignored(IgnoreReason::SelfNomination));
        }
        if !self.state.roster.is_alive(target) {
            return Ok(Ignored(IgnoreReason::InvalidTarget));
        }

        self.commit_nomination(target)?;
        Ok(Applied)
    }

    fn vote(&mut self, actor: PlayerId, approve: bool) -> Result<ActionOutcome, DomainError> {
        if let Some(reason) = self.gate(Phase::Voting, actor) {
            return Ok(Ignored(reason));
        }

        self.state.votes.cast(actor, approve);
        debug!(
            room_code = %self.state.room_code,
            player_id = %actor,
            cast = self.state.votes.len(),
            "Vote recorded"
        );

        if self.state.votes.quota_reached(self.state.roster.living_count()) {
            self.resolve_votes()?;
        }
        Ok(Applied)
    }

    pub(super) fn select_token(
        &mut self,
        actor: PlayerId,
        position: usize,
        timed_out: bool,
    ) -> Result<ActionOutcome, DomainError> {
        if let Some(reason) = self.gate(Phase::CardSelection, actor) {
            return Ok(Ignored(reason));
        }
        if token_actor(&self.state) != Some(actor) {
            return Ok(Ignored(IgnoreReason::NotTokenHolder));
        }
        let Some(deck) = self.state.deck.as_mut() else {
            return Err(DomainError::invariant("token selection without a deck"));
        };
        let Some(step) = deck.step() else {
            return Err(DomainError::invariant("token selection with nothing left to remove"));
        };
        let Some(removal) = deck.remove_at(position) else {
            return Ok(Ignored(IgnoreReason::PositionOutOfRange));
        };
        let remaining = deck.len();

        let by = self
            .state
            .roster
            .get(actor)
            .map(PlayerRef::from)
            .ok_or_else(|| DomainError::invariant("token holder missing from roster"))?;
        debug!(
            room_code = %self.state.room_code,
            player_id = %actor,
            position,
            remaining,
            timed_out,
            "Token removed"
        );
        self.broadcast(GameEvent::TokenRemoved {
            by,
            step,
            remaining,
            timed_out,
        });

        match removal {
            Removal::Continue { .. } => self.continue_token_selection(),
            Removal::ReadyToReveal => self.reveal_final_token()?,
        }
        Ok(Applied)
    }

    pub(super) fn kill(
        &mut self,
        actor: PlayerId,
        target: PlayerId,
        timed_out: bool,
    ) -> Result<ActionOutcome, DomainError> {
        if let Some(reason) = self.gate(Phase::Kill, actor) {
            return Ok(Ignored(reason));
        }
        if !self.state.is_leader(actor) {
            return Ok(Ignored(IgnoreReason::NotLeader));
        }
        if !self.state.can_kill {
            return Ok(Ignored(IgnoreReason::NoKillPermission));
        }
        if !self.state.roster.is_alive(target) {
            return Ok(Ignored(IgnoreReason::InvalidTarget));
        }

        self.execute_kill(target, timed_out)?;
        Ok(Applied)
    }

    fn guess_god(&mut self, actor: PlayerId, target: PlayerId) -> Result<ActionOutcome, DomainError> {
        if let Some(reason) = self.gate(Phase::GodGuess, actor) {
            return Ok(Ignored(reason));
        }
        if !self.state.roster.get(actor).is_some_and(|p| p.is_conspiracy()) {
            return Ok(Ignored(IgnoreReason::NotConspiracy));
        }
        if !self.state.roster.is_alive(target) {
            return Ok(Ignored(IgnoreReason::InvalidTarget));
        }

        self.state.guesses.cast(actor, target);
        let quota = self.state.roster.living_conspiracy().count();
        if self.state.guesses.quota_reached(quota) {
            let plurality = self
                .state
                .guesses
                .plurality()
                .ok_or_else(|| DomainError::invariant("guess quota reached with no ballots"))?;
            self.resolve_god_guess(plurality.target, plurality.votes, false)?;
        }
        Ok(Applied)
    }
}
