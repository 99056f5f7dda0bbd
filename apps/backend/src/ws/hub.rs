//! Process-wide index of live rooms.
//!
//! Owned by `AppState` and handed to connection actors by handle. Rooms
//! remove themselves on teardown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use actix::prelude::*;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use tracing::info;

use crate::config::GameConfig;
use crate::domain::seed_derivation::{derive_session_seed, session_rng, SessionRng};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::services::game_flow::RoomSummary;
use crate::ws::room::RoomActor;

pub const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Trim and upper-case a client-supplied room code.
pub fn normalize_room_code(raw: &str) -> Result<String, DomainError> {
    let code = raw.trim().to_ascii_uppercase();
    let well_formed = code.len() == ROOM_CODE_LEN
        && code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));
    if !well_formed {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoomCode,
            format!("room code must be {ROOM_CODE_LEN} characters from A-Z and 0-9"),
        ));
    }
    Ok(code)
}

#[derive(Clone)]
pub struct RoomEntry {
    pub addr: Addr<RoomActor>,
    summary: Arc<RwLock<RoomSummary>>,
}

impl RoomEntry {
    pub fn summary(&self) -> RoomSummary {
        self.summary.read().clone()
    }
}

pub struct SessionRegistry {
    rooms: DashMap<String, RoomEntry>,
    config: Arc<GameConfig>,
    base_seed: Option<u64>,
    ordinal: AtomicU64,
    code_rng: Mutex<SessionRng>,
}

impl SessionRegistry {
    pub fn new(config: Arc<GameConfig>, base_seed: Option<u64>) -> Arc<Self> {
        Arc::new(Self {
            rooms: DashMap::new(),
            config,
            base_seed,
            ordinal: AtomicU64::new(0),
            code_rng: Mutex::new(session_rng(base_seed)),
        })
    }

    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    /// Start a room actor under a fresh, unused code.
    ///
    /// Must be called from within a running actix system.
    pub fn create_room(self: &Arc<Self>, host_name: &str) -> (String, Addr<RoomActor>) {
        let ordinal = self.ordinal.fetch_add(1, Ordering::Relaxed);
        let seed = self.base_seed.map(|base| derive_session_seed(base, ordinal));

        loop {
            let code = generate_room_code(&mut *self.code_rng.lock());
            if let Entry::Vacant(slot) = self.rooms.entry(code.clone()) {
                let summary = Arc::new(RwLock::new(RoomSummary {
                    room_code: code.clone(),
                    host_name: host_name.to_string(),
                    player_count: 0,
                    max_players: self.config.roster_capacity,
                    started: false,
                }));
                let actor = RoomActor::new(
                    code.clone(),
                    host_name,
                    self.config.clone(),
                    seed,
                    summary.clone(),
                    Arc::downgrade(self),
                );
                let addr = actor.start();
                slot.insert(RoomEntry {
                    addr: addr.clone(),
                    summary,
                });
                info!(room_code = %code, host_name, "Room created");
                return (code, addr);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<RoomEntry> {
        self.rooms.get(code).map(|e| e.value().clone())
    }

    pub fn require(&self, code: &str) -> Result<RoomEntry, DomainError> {
        self.get(code)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, format!("room {code} does not exist")))
    }

    pub fn remove(&self, code: &str) {
        if self.rooms.remove(code).is_some() {
            info!(room_code = %code, "Room removed");
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms that have not started and still have a free seat, by code.
    pub fn joinable_rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self
            .rooms
            .iter()
            .map(|e| e.value().summary())
            .filter(RoomSummary::is_joinable)
            .collect();
        rooms.sort_by(|a, b| a.room_code.cmp(&b.room_code));
        rooms
    }
}
