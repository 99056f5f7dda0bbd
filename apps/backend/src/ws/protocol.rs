use serde::{Deserialize, Serialize};

use crate::domain::events::GameEvent;
use crate::domain::roster::PlayerId;
use crate::errors::ErrorCode;
use crate::services::game_flow::{PlayerAction, RoomSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    CreateRoom { player_name: String },
    JoinRoom { room_code: String, player_name: String },
    ListRooms,
    Nominate { target: PlayerId },
    Vote { approve: bool },
    SelectToken { position: usize },
    Kill { target: PlayerId },
    GuessGod { target: PlayerId },
    Chat { message: String },
}

impl ClientMsg {
    /// The in-game action carried by this message, if any.
    pub fn action(&self) -> Option<PlayerAction> {
        match *self {
            ClientMsg::Nominate { target } => Some(PlayerAction::Nominate { target }),
            ClientMsg::Vote { approve } => Some(PlayerAction::Vote { approve }),
            ClientMsg::SelectToken { position } => Some(PlayerAction::SelectToken { position }),
            ClientMsg::Kill { target } => Some(PlayerAction::Kill { target }),
            ClientMsg::GuessGod { target } => Some(PlayerAction::GuessGod { target }),
            ClientMsg::CreateRoom { .. }
            | ClientMsg::JoinRoom { .. }
            | ClientMsg::ListRooms
            | ClientMsg::Chat { .. } => None,
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// First frame on every connection.
    Welcome {
        player_id: PlayerId,
    },

    RoomCreated {
        room_code: String,
        host_name: String,
    },

    RoomCreateFailed {
        code: ErrorCode,
        message: String,
    },

    JoinSuccess {
        room_code: String,
        host_name: String,
    },

    JoinFailed {
        code: ErrorCode,
        message: String,
    },

    RoomList {
        rooms: Vec<RoomSummary>,
    },

    Event {
        event: GameEvent,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}
