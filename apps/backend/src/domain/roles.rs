//! Role kinds and team membership.

use serde::{Deserialize, Serialize};

/// Hidden role held by a player for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Top role; also the seer that receives demon disclosures.
    God,
    /// Privileged minority; knows who the god is.
    Archangel,
    Angel,
    /// Conspiracy member that is never disclosed to the god.
    Lucifer,
    Demon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Angel,
    Demon,
}

impl Role {
    pub const fn team(self) -> Team {
        match self {
            Role::God | Role::Archangel | Role::Angel => Team::Angel,
            Role::Lucifer | Role::Demon => Team::Demon,
        }
    }

    /// Conspiracy members see each other and vote in the god guess.
    pub const fn is_conspiracy(self) -> bool {
        matches!(self.team(), Team::Demon)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::God => "god",
            Role::Archangel => "archangel",
            Role::Angel => "angel",
            Role::Lucifer => "lucifer",
            Role::Demon => "demon",
        }
    }
}
