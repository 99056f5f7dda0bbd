//! Progressive tallies keyed by actor.
//!
//! Both tallies overwrite on duplicate and expose an explicit quota predicate
//! that the engine checks after every insert.

use serde::Serialize;

use crate::domain::roster::PlayerId;

/// Outcome of an approval vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteResult {
    pub approved: bool,
    pub approve_votes: usize,
    pub total_votes: usize,
}

/// Minimum approvals for `total` votes: `ceil(total / 2)`.
///
/// An exact half split approves, and so does an empty vote.
pub const fn approval_quorum(total: usize) -> usize {
    total.div_ceil(2)
}

/// Approval votes, last vote per player counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    votes: Vec<(PlayerId, bool)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote, replacing any earlier vote by the same player.
    pub fn cast(&mut self, voter: PlayerId, approve: bool) {
        match self.votes.iter_mut().find(|(id, _)| *id == voter) {
            Some(slot) => slot.1 = approve,
            None => self.votes.push((voter, approve)),
        }
    }

    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.votes.iter().any(|(id, _)| *id == voter)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn approve_votes(&self) -> usize {
        self.votes.iter().filter(|(_, approve)| *approve).count()
    }

    pub fn quota_reached(&self, quota: usize) -> bool {
        self.votes.len() >= quota
    }

    pub fn result(&self) -> VoteResult {
        let approve_votes = self.approve_votes();
        let total_votes = self.votes.len();
        VoteResult {
            approved: approve_votes >= approval_quorum(total_votes),
            approve_votes,
            total_votes,
        }
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

/// Result of the conspiracy's god guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plurality {
    pub target: PlayerId,
    pub votes: usize,
}

/// God-guess ballots in arrival order.
///
/// A re-guess replaces the earlier ballot and moves to the end of the
/// arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessTally {
    ballots: Vec<(PlayerId, PlayerId)>,
}

impl GuessTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&mut self, guesser: PlayerId, target: PlayerId) {
        self.ballots.retain(|(id, _)| *id != guesser);
        self.ballots.push((guesser, target));
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn quota_reached(&self, quota: usize) -> bool {
        self.ballots.len() >= quota
    }

    /// Plurality winner; ties go to the target that reached the maximum first.
    ///
    /// Ballots are replayed in arrival order and the leader only changes when a
    /// target strictly exceeds the running maximum.
    pub fn plurality(&self) -> Option<Plurality> {
        let mut counts: Vec<(PlayerId, usize)> = Vec::new();
        let mut best: Option<Plurality> = None;

        for (_, target) in &self.ballots {
            let count = match counts.iter_mut().find(|(id, _)| id == target) {
                Some(entry) => {
                    entry.1 += 1;
                    entry.1
                }
                None => {
                    counts.push((*target, 1));
                    1
                }
            };
            if best.is_none_or(|b| count > b.votes) {
                best = Some(Plurality {
                    target: *target,
                    votes: count,
                });
            }
        }

        best
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
    }
}
