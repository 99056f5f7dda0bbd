//! Error codes for the Seraph backend.
//!
//! Every code that leaves the process (HTTP problem details, websocket
//! `join_failed` / `error` frames) is defined here. Add new codes here; never
//! pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear on the wire.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the Seraph backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Display name empty or too long
    InvalidPlayerName,
    /// Room code malformed
    InvalidRoomCode,
    /// Game configuration rejected at startup
    InvalidConfig,
    /// General validation error
    ValidationError,
    /// Malformed websocket frame
    BadFrame,
    /// Game action sent before joining a room
    NotInRoom,

    // Resource Not Found
    /// Room does not exist (or was torn down)
    RoomNotFound,
    /// General not found error
    NotFound,

    // Join rejections
    /// Roster already at capacity
    RoomFull,
    /// Game already started in this room
    GameAlreadyStarted,
    /// Display name already used in this room
    NameTaken,
    /// Connection already seated in a room
    AlreadyInRoom,

    // System Errors
    /// Session engine hit an impossible state
    InvariantViolation,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPlayerName => "INVALID_PLAYER_NAME",
            Self::InvalidRoomCode => "INVALID_ROOM_CODE",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadFrame => "BAD_FRAME",
            Self::NotInRoom => "NOT_IN_ROOM",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoomFull => "ROOM_FULL",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::NameTaken => "NAME_TAKEN",
            Self::AlreadyInRoom => "ALREADY_IN_ROOM",

            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
