//! Game constants for one session.
//!
//! A `GameConfig` is fixed for the lifetime of a session; it is shared by
//! reference between the engine and the room actor and never mutated.

use crate::domain::roles::Role;
use crate::errors::domain::{DomainError, ValidationKind};

/// Number of holders per role kind.
///
/// God, archangel and lucifer are unique kinds; angels and demons are
/// replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCounts {
    pub angels: usize,
    pub demons: usize,
}

impl RoleCounts {
    /// Total roster size implied by these counts (three unique roles included).
    pub fn total(&self) -> usize {
        3 + self.angels + self.demons
    }

    /// The role multiset in canonical order, before shuffling.
    pub fn multiset(&self) -> Vec<Role> {
        let mut roles = Vec::with_capacity(self.total());
        roles.push(Role::God);
        roles.push(Role::Archangel);
        roles.extend(std::iter::repeat_n(Role::Angel, self.angels));
        roles.push(Role::Lucifer);
        roles.extend(std::iter::repeat_n(Role::Demon, self.demons));
        roles
    }

    pub fn count_of(&self, role: Role) -> usize {
        match role {
            Role::God | Role::Archangel | Role::Lucifer => 1,
            Role::Angel => self.angels,
            Role::Demon => self.demons,
        }
    }
}

/// Per-phase deadlines, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDeadlines {
    pub nomination_secs: u32,
    pub voting_secs: u32,
    pub token_selection_secs: u32,
    pub kill_secs: u32,
    pub god_guess_secs: u32,
    /// Delay between the roster filling up and role assignment.
    pub start_delay_secs: u32,
    /// Pause between a resolved turn and the next nomination.
    pub settle_secs: u32,
    /// How long a finished session stays reachable before teardown.
    pub teardown_grace_secs: u32,
}

/// Token bag composition and draw size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckConfig {
    pub good_tokens: usize,
    pub evil_tokens: usize,
    pub draw_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub roster_capacity: usize,
    pub roles: RoleCounts,
    pub deadlines: PhaseDeadlines,
    pub deck: DeckConfig,
    pub good_win_threshold: u32,
    pub evil_win_threshold: u32,
    /// Evil deed count at which the leader is granted one kill.
    pub lethal_unlock_threshold: u32,
    /// Maximum number of demons ever disclosed to the god.
    pub demon_disclosure_cap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            roster_capacity: 10,
            roles: RoleCounts {
                angels: 4,
                demons: 3,
            },
            deadlines: PhaseDeadlines {
                nomination_secs: 600,
                voting_secs: 120,
                token_selection_secs: 120,
                kill_secs: 60,
                god_guess_secs: 120,
                start_delay_secs: 1,
                settle_secs: 3,
                teardown_grace_secs: 30,
            },
            deck: DeckConfig {
                good_tokens: 10,
                evil_tokens: 20,
                draw_count: 3,
            },
            good_win_threshold: 5,
            evil_win_threshold: 5,
            lethal_unlock_threshold: 4,
            demon_disclosure_cap: 3,
        }
    }
}

impl GameConfig {
    /// Reject configurations the session engine cannot run.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |detail: String| DomainError::validation(ValidationKind::InvalidConfig, detail);

        if self.roles.total() != self.roster_capacity {
            return Err(invalid(format!(
                "role counts sum to {} but roster capacity is {}",
                self.roles.total(),
                self.roster_capacity
            )));
        }
        if self.deck.draw_count < 2 {
            return Err(invalid("draw count must be at least 2".to_string()));
        }
        if self.deck.draw_count > self.deck.good_tokens + self.deck.evil_tokens {
            return Err(invalid(format!(
                "draw count {} exceeds the {} tokens in the bag",
                self.deck.draw_count,
                self.deck.good_tokens + self.deck.evil_tokens
            )));
        }
        if self.good_win_threshold == 0
            || self.evil_win_threshold == 0
            || self.lethal_unlock_threshold == 0
        {
            return Err(invalid("thresholds must be at least 1".to_string()));
        }
        if self.lethal_unlock_threshold >= self.evil_win_threshold {
            return Err(invalid(format!(
                "lethal unlock threshold {} must be below the evil win threshold {}",
                self.lethal_unlock_threshold, self.evil_win_threshold
            )));
        }
        Ok(())
    }

    /// Compact configuration for tests: 5 players, short deadlines.
    pub fn for_tests() -> Self {
        Self {
            roster_capacity: 5,
            roles: RoleCounts {
                angels: 1,
                demons: 1,
            },
            deadlines: PhaseDeadlines {
                nomination_secs: 5,
                voting_secs: 5,
                token_selection_secs: 5,
                kill_secs: 5,
                god_guess_secs: 5,
                start_delay_secs: 1,
                settle_secs: 1,
                teardown_grace_secs: 2,
            },
            ..Self::default()
        }
    }
}
