//! The fixed set of participants in one session.

use uuid::Uuid;

use crate::domain::roles::Role;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Opaque, stable participant identity (the transport's connection id).
pub type PlayerId = Uuid;

pub const MAX_NAME_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Assigned once at game start; `None` while waiting.
    pub role: Option<Role>,
    /// Flips true -> false exactly once.
    pub alive: bool,
    /// Bookkeeping only; quotas are computed from `alive`.
    pub connected: bool,
}

impl Player {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    pub fn is_conspiracy(&self) -> bool {
        self.role.is_some_and(Role::is_conspiracy)
    }
}

/// Result of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFill {
    Waiting { current: usize, capacity: usize },
    Full,
}

/// Ordered roster, insertion order = join order.
///
/// Single writer: mutated only by the owning session between actions.
#[derive(Debug, Clone)]
pub struct Roster {
    capacity: usize,
    players: Vec<Player>,
    started: bool,
}

impl Roster {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            players: Vec::with_capacity(capacity),
            started: false,
        }
    }

    pub fn add(&mut self, id: PlayerId, name: &str) -> Result<RosterFill, DomainError> {
        if self.started {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyStarted,
                "game already started",
            ));
        }
        if self.contains(id) {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyInRoom,
                "connection already seated in this room",
            ));
        }
        let name = validate_name(name)?;
        if self.players.len() >= self.capacity {
            return Err(DomainError::conflict(ConflictKind::RosterFull, "room is full"));
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(DomainError::conflict(
                ConflictKind::NameTaken,
                format!("name '{name}' is already in use"),
            ));
        }

        self.players.push(Player {
            id,
            name,
            role: None,
            alive: true,
            connected: true,
        });

        if self.is_full() {
            Ok(RosterFill::Full)
        } else {
            Ok(RosterFill::Waiting {
                current: self.players.len(),
                capacity: self.capacity,
            })
        }
    }

    /// Remove a player before the game starts.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == self.capacity
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, id.to_string()))
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive().map(|p| p.id).collect()
    }

    pub fn living_count(&self) -> usize {
        self.alive().count()
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    pub fn living_conspiracy(&self) -> impl Iterator<Item = &Player> {
        self.alive().filter(|p| p.is_conspiracy())
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.connected).count()
    }

    /// Unique holder of a role, if assigned.
    pub fn holder_of(&self, role: Role) -> Option<&Player> {
        self.players.iter().find(|p| p.has_role(role))
    }

    pub fn set_connected(&mut self, id: PlayerId, connected: bool) -> bool {
        match self.get_mut(id) {
            Some(player) => {
                player.connected = connected;
                true
            }
            None => false,
        }
    }

    /// Mark a living player dead. Returns false if unknown or already dead.
    pub fn kill(&mut self, id: PlayerId) -> bool {
        match self.get_mut(id) {
            Some(player) if player.alive => {
                player.alive = false;
                true
            }
            _ => false,
        }
    }
}

pub fn validate_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            "name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            format!("name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}
