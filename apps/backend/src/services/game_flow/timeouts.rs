//! Clock tick and per-phase deadline fallbacks.
//!
//! Every fallback synthesizes the missing input at random and then takes the
//! same path the manual action would have taken.

use rand::Rng;
use tracing::{info, warn};

use super::timer::{TimerKind, TimerTick};
use super::GameFlow;
use crate::domain::events::GameEvent;
use crate::domain::player_view::token_actor;
use crate::domain::roster::PlayerId;
use crate::domain::shuffle::choose;
use crate::domain::state::Phase;
use crate::errors::domain::DomainError;

impl GameFlow {
    /// Advance the session clock by one second.
    pub fn tick(&mut self) -> Result<(), DomainError> {
        let Some(tick) = self.timer.tick() else {
            return Ok(());
        };

        match tick {
            TimerTick::Running { kind, remaining } => {
                if kind.is_phase_deadline() {
                    self.broadcast(GameEvent::TimerUpdate { remaining });
                }
                Ok(())
            }
            TimerTick::Expired(kind) => {
                if kind.is_phase_deadline() {
                    self.broadcast(GameEvent::TimerUpdate { remaining: 0 });
                }
                let result = self.on_expired(kind);
                if let Err(err) = &result {
                    self.abort(err);
                }
                result
            }
        }
    }

    fn on_expired(&mut self, kind: TimerKind) -> Result<(), DomainError> {
        let expected = match kind {
            TimerKind::GameStart => Phase::Waiting,
            TimerKind::Nomination => Phase::Nomination,
            TimerKind::Voting => Phase::Voting,
            TimerKind::TokenSelection => Phase::CardSelection,
            TimerKind::Kill => Phase::Kill,
            TimerKind::GodGuess => Phase::GodGuess,
            TimerKind::TurnSettle => Phase::TurnTransition,
            TimerKind::Teardown => Phase::GameOver,
        };
        if self.state.phase != expected {
            warn!(
                room_code = %self.state.room_code,
                phase = self.state.phase.as_str(),
                ?kind,
                "Stale deadline expired; ignored"
            );
            return Ok(());
        }

        if kind.is_phase_deadline() {
            info!(
                room_code = %self.state.room_code,
                phase = self.state.phase.as_str(),
                turn_index = self.state.current_turn_index,
                "Phase deadline expired; applying fallback"
            );
        }

        match kind {
            TimerKind::GameStart => self.start_game(),
            TimerKind::Nomination => self.nomination_timeout(),
            TimerKind::Voting => self.resolve_votes(),
            TimerKind::TokenSelection => self.token_timeout(),
            TimerKind::Kill => self.kill_timeout(),
            TimerKind::GodGuess => self.god_guess_timeout(),
            TimerKind::TurnSettle => self.begin_nomination(),
            TimerKind::Teardown => {
                info!(room_code = %self.state.room_code, "Grace period over; tearing down");
                self.teardown();
                Ok(())
            }
        }
    }

    /// Uniform choice among living players other than the leader.
    fn nomination_timeout(&mut self) -> Result<(), DomainError> {
        let leader = self.state.leader_id();
        let eligible: Vec<PlayerId> = self
            .state
            .roster
            .alive()
            .filter(|p| Some(p.id) != leader)
            .map(|p| p.id)
            .collect();

        match choose(&eligible, &mut self.rng).copied() {
            Some(target) => self.commit_nomination(target),
            None => {
                info!(room_code = %self.state.room_code, "Nobody to nominate; skipping turn");
                self.advance_turn()
            }
        }
    }

    /// Uniform position, removed on behalf of whoever holds authority.
    fn token_timeout(&mut self) -> Result<(), DomainError> {
        let actor = token_actor(&self.state)
            .ok_or_else(|| DomainError::invariant("token deadline with no token holder"))?;
        let len = self.state.deck.as_ref().map_or(0, |d| d.len());
        if len == 0 {
            return Err(DomainError::invariant("token deadline with an empty deck"));
        }
        let position = self.rng.random_range(0..len);
        let outcome = self.select_token(actor, position, true)?;
        if !outcome.is_applied() {
            return Err(DomainError::invariant(format!(
                "token fallback was rejected: {outcome:?}"
            )));
        }
        Ok(())
    }

    /// Uniform living target, the leader included.
    fn kill_timeout(&mut self) -> Result<(), DomainError> {
        let leader = self
            .state
            .leader_id()
            .ok_or_else(|| DomainError::invariant("kill deadline without a leader"))?;
        let living = self.state.roster.alive_ids();
        let target = choose(&living, &mut self.rng)
            .copied()
            .ok_or_else(|| DomainError::invariant("kill deadline with nobody alive"))?;
        let outcome = self.kill(leader, target, true)?;
        if !outcome.is_applied() {
            return Err(DomainError::invariant(format!(
                "kill fallback was rejected: {outcome:?}"
            )));
        }
        Ok(())
    }

    /// Uniform living target, counted as a unanimous guess.
    fn god_guess_timeout(&mut self) -> Result<(), DomainError> {
        let living = self.state.roster.alive_ids();
        let target = choose(&living, &mut self.rng)
            .copied()
            .ok_or_else(|| DomainError::invariant("god guess deadline with nobody alive"))?;
        let votes = self.state.roster.living_conspiracy().count();
        self.resolve_god_guess(target, votes, true)
    }
}
