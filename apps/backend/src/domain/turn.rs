//! Turn order and the per-turn audit trail.

use rand::Rng;
use serde::Serialize;

use crate::domain::roster::{PlayerId, Roster};
use crate::domain::shuffle::fisher_yates;
use crate::domain::tally::VoteResult;
use crate::errors::domain::DomainError;

/// Progress of one turn. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Pending,
    Nominating,
    Voting,
    Approved,
    Rejected,
    Completed,
}

impl TurnStatus {
    /// Position in the forward order; approved and rejected share a rank.
    const fn rank(self) -> u8 {
        match self {
            TurnStatus::Pending => 0,
            TurnStatus::Nominating => 1,
            TurnStatus::Voting => 2,
            TurnStatus::Approved | TurnStatus::Rejected => 3,
            TurnStatus::Completed => 4,
        }
    }

    pub const fn can_advance_to(self, next: TurnStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// One entry of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub round: u32,
    pub turn_index: usize,
    pub leader: PlayerId,
    pub status: TurnStatus,
    pub proposed_executor: Option<PlayerId>,
    pub vote_result: Option<VoteResult>,
}

impl TurnRecord {
    fn advance(&mut self, next: TurnStatus) -> Result<(), DomainError> {
        if !self.status.can_advance_to(next) {
            return Err(DomainError::invariant(format!(
                "turn {} (round {}) cannot move from {:?} to {:?}",
                self.turn_index, self.round, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

/// Append-only history of every turn played in a session.
///
/// A record is opened when its turn begins nomination and mutated in place
/// until completed; records are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnHistory {
    records: Vec<TurnRecord>,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    /// Most recent record for a turn-order slot.
    pub fn latest_for_index(&self, turn_index: usize) -> Option<&TurnRecord> {
        self.records.iter().rev().find(|r| r.turn_index == turn_index)
    }

    /// Open the record for a new turn in `Nominating` status.
    pub fn open(&mut self, round: u32, turn_index: usize, leader: PlayerId) -> Result<(), DomainError> {
        if let Some(prev) = self.records.last() {
            if prev.status != TurnStatus::Completed {
                return Err(DomainError::invariant(format!(
                    "turn {} opened while round {} is still {:?}",
                    turn_index, prev.round, prev.status
                )));
            }
        }
        self.records.push(TurnRecord {
            round,
            turn_index,
            leader,
            status: TurnStatus::Nominating,
            proposed_executor: None,
            vote_result: None,
        });
        Ok(())
    }

    pub fn record_nomination(&mut self, executor: PlayerId) -> Result<(), DomainError> {
        let record = self.current_mut()?;
        record.advance(TurnStatus::Voting)?;
        record.proposed_executor = Some(executor);
        Ok(())
    }

    pub fn record_vote(&mut self, result: VoteResult) -> Result<(), DomainError> {
        let record = self.current_mut()?;
        let next = if result.approved {
            TurnStatus::Approved
        } else {
            TurnStatus::Rejected
        };
        record.advance(next)?;
        record.vote_result = Some(result);
        Ok(())
    }

    pub fn complete_current(&mut self) -> Result<(), DomainError> {
        self.current_mut()?.advance(TurnStatus::Completed)
    }

    fn current_mut(&mut self) -> Result<&mut TurnRecord, DomainError> {
        self.records
            .last_mut()
            .ok_or_else(|| DomainError::invariant("no turn is in progress"))
    }
}

/// Fixed leader rotation, a uniform permutation of the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOrder {
    order: Vec<PlayerId>,
}

impl TurnOrder {
    pub fn draw<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Self {
        let mut order: Vec<PlayerId> = roster.players().iter().map(|p| p.id).collect();
        fisher_yates(&mut order, rng);
        Self { order }
    }

    pub fn from_ids(order: Vec<PlayerId>) -> Self {
        Self { order }
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<PlayerId> {
        self.order.get(index).copied()
    }

    /// First living slot at or after `start`, wrapping around.
    pub fn living_from(&self, start: usize, roster: &Roster) -> Option<usize> {
        let len = self.order.len();
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&idx| roster.is_alive(self.order[idx]))
    }

    /// Next living slot strictly after `current`.
    pub fn next_living(&self, current: usize, roster: &Roster) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        self.living_from(current + 1, roster)
    }
}
