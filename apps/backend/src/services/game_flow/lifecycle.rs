//! Phase entries and transitions shared by manual actions and timeouts.

use tracing::{error, info, warn};

use super::timer::TimerKind;
use super::GameFlow;
use crate::domain::deck::{Deck, Token};
use crate::domain::events::{GameEvent, Outbound};
use crate::domain::player_view::{game_over_summary, role_briefing, PlayerRef, RevealedPlayer};
use crate::domain::role_assignment::assign_roles;
use crate::domain::roles::Role;
use crate::domain::roster::PlayerId;
use crate::domain::shuffle::choose;
use crate::domain::state::Phase;
use crate::domain::turn::{TurnOrder, TurnStatus};
use crate::domain::win::{evaluate, GameOverReason, WinCheck};
use crate::errors::domain::DomainError;

impl GameFlow {
    /// Assign roles, fix the turn order and open the first nomination.
    ///
    /// Skipped if the roster is no longer full when the start delay elapses.
    pub(super) fn start_game(&mut self) -> Result<(), DomainError> {
        if self.state.roster.is_started() {
            return Ok(());
        }
        if !self.state.roster.is_full() {
            warn!(
                room_code = %self.state.room_code,
                players = self.state.roster.len(),
                "Roster no longer full at start; still waiting"
            );
            return Ok(());
        }

        self.state.assignment =
            assign_roles(&mut self.state.roster, &self.config.roles, &mut self.rng)?;
        self.state.roster.mark_started();
        self.state.turn_order = TurnOrder::draw(&self.state.roster, &mut self.rng);
        self.state.current_turn_index = 0;
        self.state.round = 1;

        info!(room_code = %self.state.room_code, players = self.state.roster.len(), "Game started");

        let ids: Vec<PlayerId> = self.state.roster.players().iter().map(|p| p.id).collect();
        for id in ids {
            if let Some(briefing) = role_briefing(&self.state, id) {
                self.emit(Outbound::only(id, GameEvent::RoleAssigned(briefing)));
            }
        }
        self.emit_game_state();
        self.begin_nomination()
    }

    pub(super) fn begin_nomination(&mut self) -> Result<(), DomainError> {
        let leader = self
            .state
            .leader_id()
            .ok_or_else(|| DomainError::invariant("nomination without a leader"))?;
        if !self.state.roster.is_alive(leader) {
            return Err(DomainError::invariant("current turn index points at a dead player"));
        }

        self.state.phase = Phase::Nomination;
        self.state.proposed_executor = None;
        self.state.votes.clear();
        self.state
            .history
            .open(self.state.round, self.state.current_turn_index, leader)?;

        info!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            turn_index = self.state.current_turn_index,
            round = self.state.round,
            leader = %leader,
            "Nomination opened"
        );

        self.emit_game_state();
        self.timer
            .arm(TimerKind::Nomination, self.config.deadlines.nomination_secs);
        self.emit_phase_change();
        self.emit_turn_order();
        Ok(())
    }

    pub(super) fn commit_nomination(&mut self, executor: PlayerId) -> Result<(), DomainError> {
        self.timer.cancel();
        self.state.proposed_executor = Some(executor);
        self.state.history.record_nomination(executor)?;
        self.emit_turn_order();
        self.begin_voting();
        Ok(())
    }

    fn begin_voting(&mut self) {
        self.state.phase = Phase::Voting;
        self.state.votes.clear();
        info!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            turn_index = self.state.current_turn_index,
            "Voting opened"
        );
        self.emit_game_state();
        self.timer.arm(TimerKind::Voting, self.config.deadlines.voting_secs);
        self.emit_phase_change();
    }

    /// Resolve the approval vote with the ballots cast so far.
    pub(super) fn resolve_votes(&mut self) -> Result<(), DomainError> {
        self.timer.cancel();
        let result = self.state.votes.result();
        self.state.history.record_vote(result)?;

        info!(
            room_code = %self.state.room_code,
            turn_index = self.state.current_turn_index,
            approved = result.approved,
            approve_votes = result.approve_votes,
            total_votes = result.total_votes,
            "Vote resolved"
        );

        self.broadcast(GameEvent::VoteResults(result));
        self.emit_turn_order();

        if result.approved {
            self.begin_card_selection();
            Ok(())
        } else {
            self.advance_turn()
        }
    }

    fn begin_card_selection(&mut self) {
        self.state.phase = Phase::CardSelection;
        self.state.deck = Some(Deck::draw(&self.config.deck, &mut self.rng));
        info!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            turn_index = self.state.current_turn_index,
            "Token selection opened"
        );
        self.emit_game_state();
        self.timer
            .arm(TimerKind::TokenSelection, self.config.deadlines.token_selection_secs);
        self.emit_phase_change();
    }

    /// Hand removal authority to the next actor after a removal.
    pub(super) fn continue_token_selection(&mut self) {
        self.timer
            .arm(TimerKind::TokenSelection, self.config.deadlines.token_selection_secs);
        self.emit_phase_change();
    }

    /// Reveal the last token and apply its effects.
    pub(super) fn reveal_final_token(&mut self) -> Result<(), DomainError> {
        self.timer.cancel();
        let token = self
            .state
            .deck
            .as_mut()
            .and_then(Deck::take_final)
            .ok_or_else(|| DomainError::invariant("reveal requested with more than one token left"))?;
        self.state.deck = None;
        self.state.completed_turns += 1;

        let mut kill_unlocked = false;
        match token {
            Token::Good => self.state.good_deeds += 1,
            Token::Evil => {
                self.state.evil_deeds += 1;
                self.disclose_demon();
                if self.state.evil_deeds == self.config.lethal_unlock_threshold {
                    self.state.can_kill = true;
                    kill_unlocked = true;
                }
            }
        }
        debug_assert!(self.state.good_deeds + self.state.evil_deeds == self.state.completed_turns);

        info!(
            room_code = %self.state.room_code,
            turn_index = self.state.current_turn_index,
            ?token,
            good_deeds = self.state.good_deeds,
            evil_deeds = self.state.evil_deeds,
            "Final token revealed"
        );

        self.broadcast(GameEvent::TokenRevealed {
            token,
            good_deeds: self.state.good_deeds,
            evil_deeds: self.state.evil_deeds,
        });

        if kill_unlocked {
            self.begin_kill();
            Ok(())
        } else {
            self.check_win()
        }
    }

    /// Seer-only disclosure of one more living, undisclosed demon.
    fn disclose_demon(&mut self) {
        let Some(god) = self.state.roster.holder_of(Role::God) else {
            return;
        };
        if !god.alive || self.state.disclosed_demons.len() >= self.config.demon_disclosure_cap {
            return;
        }
        let god_id = god.id;

        let candidates: Vec<PlayerId> = self
            .state
            .roster
            .alive()
            .filter(|p| p.has_role(Role::Demon) && !self.state.disclosed_demons.contains(&p.id))
            .map(|p| p.id)
            .collect();
        let Some(&demon) = choose(&candidates, &mut self.rng) else {
            return;
        };
        self.state.disclosed_demons.push(demon);

        let disclosed: Vec<PlayerRef> = self
            .state
            .disclosed_demons
            .iter()
            .filter_map(|id| self.state.roster.get(*id))
            .map(PlayerRef::from)
            .collect();
        let Some(demon) = self.state.roster.get(demon).map(PlayerRef::from) else {
            return;
        };

        info!(
            room_code = %self.state.room_code,
            disclosed = disclosed.len(),
            "Demon disclosed to the god"
        );
        self.emit(Outbound::only(god_id, GameEvent::DemonDisclosed { demon, disclosed }));
    }

    fn begin_kill(&mut self) {
        self.state.phase = Phase::Kill;
        info!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            turn_index = self.state.current_turn_index,
            "Kill unlocked"
        );
        self.emit_game_state();
        self.timer.arm(TimerKind::Kill, self.config.deadlines.kill_secs);
        self.emit_phase_change();
    }

    pub(super) fn execute_kill(&mut self, target: PlayerId, timed_out: bool) -> Result<(), DomainError> {
        self.timer.cancel();
        if !self.state.roster.kill(target) {
            return Err(DomainError::invariant("kill target was not a living player"));
        }
        self.state.casualties.push(target);
        self.state.can_kill = false;

        let player = RevealedPlayer::from(self.state.roster.require(target)?);
        info!(
            room_code = %self.state.room_code,
            player_id = %target,
            role = ?player.role,
            timed_out,
            "Player killed"
        );
        self.broadcast(GameEvent::PlayerKilled { player, timed_out });
        self.check_win()
    }

    pub(super) fn check_win(&mut self) -> Result<(), DomainError> {
        let check = evaluate(
            self.state.good_deeds,
            self.state.evil_deeds,
            &self.state.roster,
            &self.config,
        )?;
        match check {
            WinCheck::GameOver(reason) => {
                self.end_game(reason)?;
                Ok(())
            }
            WinCheck::EnterGodGuess => self.begin_god_guess(),
            WinCheck::Continue => self.advance_turn(),
        }
    }

    fn begin_god_guess(&mut self) -> Result<(), DomainError> {
        self.state.guesses.clear();
        if self.state.roster.living_conspiracy().next().is_none() {
            info!(room_code = %self.state.room_code, "No living conspiracy; god guess skipped");
            self.broadcast(GameEvent::GodGuessResults {
                guessed: None,
                correct: false,
                votes: 0,
                timed_out: false,
            });
            return self.end_game(GameOverReason::GoodDeeds);
        }

        self.state.phase = Phase::GodGuess;
        info!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            "God guess opened"
        );
        self.emit_game_state();
        self.timer
            .arm(TimerKind::GodGuess, self.config.deadlines.god_guess_secs);
        self.emit_phase_change();
        Ok(())
    }

    pub(super) fn resolve_god_guess(
        &mut self,
        target: PlayerId,
        votes: usize,
        timed_out: bool,
    ) -> Result<(), DomainError> {
        self.timer.cancel();
        let guessed = self.state.roster.require(target)?;
        let correct = guessed.has_role(Role::God);
        let guessed = RevealedPlayer::from(guessed);

        info!(
            room_code = %self.state.room_code,
            player_id = %target,
            votes,
            correct,
            timed_out,
            "God guess resolved"
        );
        self.broadcast(GameEvent::GodGuessResults {
            guessed: Some(guessed),
            correct,
            votes,
            timed_out,
        });

        let reason = if correct {
            GameOverReason::GodIdentified
        } else {
            GameOverReason::GoodDeeds
        };
        self.end_game(reason)
    }

    /// Close the current turn and move the leader to the next living slot.
    pub(super) fn advance_turn(&mut self) -> Result<(), DomainError> {
        self.timer.cancel();
        self.state.history.complete_current()?;
        self.state.proposed_executor = None;
        self.state.votes.clear();

        let next = self
            .state
            .turn_order
            .next_living(self.state.current_turn_index, &self.state.roster)
            .ok_or_else(|| DomainError::invariant("no living player left in the turn order"))?;
        self.state.current_turn_index = next;
        self.state.round += 1;
        self.state.phase = Phase::TurnTransition;

        info!(
            room_code = %self.state.room_code,
            turn_index = next,
            round = self.state.round,
            "Turn advanced"
        );

        self.emit_game_state();
        self.emit_turn_order();
        self.timer
            .arm(TimerKind::TurnSettle, self.config.deadlines.settle_secs);
        Ok(())
    }

    pub(super) fn end_game(&mut self, reason: GameOverReason) -> Result<(), DomainError> {
        self.timer.cancel();
        if let Some(record) = self.state.history.current() {
            if record.status != TurnStatus::Completed {
                self.state.history.complete_current()?;
            }
        }
        self.state.phase = Phase::GameOver;
        self.state.deck = None;
        self.state.can_kill = false;

        info!(
            room_code = %self.state.room_code,
            ?reason,
            winner = ?reason.winner(),
            rounds = self.state.round,
            "Game over"
        );

        self.emit_game_state();
        let summary = game_over_summary(&self.state, reason);
        self.broadcast(GameEvent::GameOver(summary));
        self.timer
            .arm(TimerKind::Teardown, self.config.deadlines.teardown_grace_secs);
        Ok(())
    }

    /// Log an invariant failure and stop the session.
    pub(super) fn abort(&mut self, err: &DomainError) {
        error!(
            room_code = %self.state.room_code,
            phase = self.state.phase.as_str(),
            error = %err,
            "Invariant violated; tearing session down"
        );
        self.teardown();
    }
}
