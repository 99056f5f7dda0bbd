//! Win-condition evaluation.

use serde::Serialize;

use crate::config::GameConfig;
use crate::domain::roles::{Role, Team};
use crate::domain::roster::Roster;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// Evil deeds reached the evil win threshold.
    EvilDeeds,
    /// The god was killed.
    GodSlain,
    /// The conspiracy named the god in the final guess.
    GodIdentified,
    /// Good deeds reached the threshold and the god survived the guess.
    GoodDeeds,
}

impl GameOverReason {
    pub const fn winner(self) -> Team {
        match self {
            GameOverReason::EvilDeeds | GameOverReason::GodSlain | GameOverReason::GodIdentified => {
                Team::Demon
            }
            GameOverReason::GoodDeeds => Team::Angel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinCheck {
    GameOver(GameOverReason),
    /// Good deeds reached the threshold; the conspiracy gets a final guess.
    EnterGodGuess,
    Continue,
}

/// Evaluate counters and roster in fixed priority order.
///
/// Evil threshold, then god death, then good threshold. Exactly one branch
/// fires. A roster without a god is an invariant violation.
pub fn evaluate(
    good_deeds: u32,
    evil_deeds: u32,
    roster: &Roster,
    config: &GameConfig,
) -> Result<WinCheck, DomainError> {
    if evil_deeds >= config.evil_win_threshold {
        return Ok(WinCheck::GameOver(GameOverReason::EvilDeeds));
    }

    let god = roster
        .holder_of(Role::God)
        .ok_or_else(|| DomainError::invariant("win check ran without a god in the roster"))?;
    if !god.alive {
        return Ok(WinCheck::GameOver(GameOverReason::GodSlain));
    }

    if good_deeds >= config.good_win_threshold {
        return Ok(WinCheck::EnterGodGuess);
    }

    Ok(WinCheck::Continue)
}
