//! One-shot role distribution and the known-allies visibility graph.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::config::RoleCounts;
use crate::domain::roles::Role;
use crate::domain::roster::{PlayerId, Roster};
use crate::domain::shuffle::fisher_yates;
use crate::errors::domain::{DomainError, ValidationKind};

/// A player whose identity and role another player is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownAlly {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
}

/// Immutable visibility graph computed once at assignment time.
///
/// - the archangel sees the god;
/// - each conspiracy member sees every other conspiracy member;
/// - everyone else sees nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    allies: HashMap<PlayerId, Vec<KnownAlly>>,
}

impl RoleAssignment {
    pub fn known_allies(&self, id: PlayerId) -> &[KnownAlly] {
        self.allies.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Shuffle the role multiset and hand one role to each roster slot in roster order.
///
/// The caller gates on capacity; a roster of the wrong size or one that
/// already carries roles is rejected without mutating anything.
pub fn assign_roles<R: Rng + ?Sized>(
    roster: &mut Roster,
    counts: &RoleCounts,
    rng: &mut R,
) -> Result<RoleAssignment, DomainError> {
    if roster.len() != counts.total() {
        return Err(DomainError::validation(
            ValidationKind::InvalidRosterSize,
            format!(
                "roster has {} players but the role set needs {}",
                roster.len(),
                counts.total()
            ),
        ));
    }
    if roster.players().iter().any(|p| p.role.is_some()) {
        return Err(DomainError::invariant("roles were already assigned"));
    }

    let mut roles = counts.multiset();
    fisher_yates(&mut roles, rng);

    for (player, role) in roster.players_mut().iter_mut().zip(roles) {
        player.role = Some(role);
    }

    Ok(compute_known_allies(roster))
}

fn compute_known_allies(roster: &Roster) -> RoleAssignment {
    let god = roster.holder_of(Role::God);
    let mut allies = HashMap::with_capacity(roster.len());

    for player in roster.players() {
        let seen: Vec<KnownAlly> = match player.role {
            Some(Role::Archangel) => god
                .map(|g| KnownAlly {
                    id: g.id,
                    name: g.name.clone(),
                    role: Role::God,
                })
                .into_iter()
                .collect(),
            Some(role) if role.is_conspiracy() => roster
                .players()
                .iter()
                .filter(|other| other.id != player.id && other.is_conspiracy())
                .filter_map(|other| {
                    other.role.map(|role| KnownAlly {
                        id: other.id,
                        name: other.name.clone(),
                        role,
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        allies.insert(player.id, seen);
    }

    RoleAssignment { allies }
}
