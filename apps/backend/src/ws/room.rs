//! One actor per room: owns the `GameFlow`, drives its clock and fans its
//! effects out to the connected sessions.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use actix::prelude::*;
use parking_lot::RwLock;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::domain::events::Audience;
use crate::domain::roster::PlayerId;
use crate::errors::domain::DomainError;
use crate::services::game_flow::{FlowEffect, GameFlow, LeaveOutcome, PlayerAction, RoomSummary};
use crate::ws::hub::SessionRegistry;
use crate::ws::protocol::ServerMsg;
use crate::ws::session::Shutdown;

const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Frame pushed from a room to one session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum Deliver {
    /// Pre-serialized `ServerMsg`, shared across the audience.
    Frame(Arc<str>),
    /// The room was torn down; forget it.
    Closed { room_code: String },
}

/// Seat a connection. On success the room confirms to `recipient` before
/// any roster broadcast.
#[derive(Message)]
#[rtype(result = "Result<(), DomainError>")]
pub struct Join {
    pub player_id: PlayerId,
    pub name: String,
    pub recipient: Recipient<Deliver>,
    pub created: bool,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub player_id: PlayerId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Act {
    pub player_id: PlayerId,
    pub action: PlayerAction,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Chat {
    pub player_id: PlayerId,
    pub message: String,
}

pub struct RoomActor {
    flow: GameFlow,
    members: HashMap<PlayerId, Recipient<Deliver>>,
    summary: Arc<RwLock<RoomSummary>>,
    registry: Weak<SessionRegistry>,
}

impl RoomActor {
    pub fn new(
        room_code: String,
        host_name: &str,
        config: Arc<GameConfig>,
        seed: Option<u64>,
        summary: Arc<RwLock<RoomSummary>>,
        registry: Weak<SessionRegistry>,
    ) -> Self {
        Self {
            flow: GameFlow::new(room_code, host_name, config, seed),
            members: HashMap::new(),
            summary,
            registry,
        }
    }

    fn send_to(recipient: &Recipient<Deliver>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => recipient.do_send(Deliver::Frame(payload.into())),
            Err(err) => warn!(error = %err, "[ROOM] failed to serialize outbound message"),
        }
    }

    /// Deliver queued effects, then publish the refreshed listing entry.
    fn flush(&mut self, ctx: &mut Context<Self>) {
        for effect in self.flow.drain() {
            match effect {
                FlowEffect::Emit(outbound) => {
                    let msg = ServerMsg::Event {
                        event: outbound.event,
                    };
                    let payload: Arc<str> = match serde_json::to_string(&msg) {
                        Ok(payload) => payload.into(),
                        Err(err) => {
                            warn!(error = %err, "[ROOM] failed to serialize event");
                            continue;
                        }
                    };
                    match outbound.audience {
                        Audience::All => {
                            for recipient in self.members.values() {
                                recipient.do_send(Deliver::Frame(payload.clone()));
                            }
                        }
                        Audience::Only(id) => {
                            if let Some(recipient) = self.members.get(&id) {
                                recipient.do_send(Deliver::Frame(payload));
                            }
                        }
                    }
                }
                FlowEffect::Teardown => {
                    self.close(ctx);
                    return;
                }
            }
        }
        *self.summary.write() = self.flow.summary();
    }

    fn close(&mut self, ctx: &mut Context<Self>) {
        let room_code = self.flow.room_code().to_string();
        for recipient in self.members.values() {
            recipient.do_send(Deliver::Closed {
                room_code: room_code.clone(),
            });
        }
        self.members.clear();
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&room_code);
        }
        ctx.stop();
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(room_code = %self.flow.room_code(), "[ROOM] started");
        ctx.run_interval(CLOCK_INTERVAL, |actor, ctx| {
            // Failures are logged and torn down inside the flow.
            let _ = actor.flow.tick();
            actor.flush(ctx);
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(room_code = %self.flow.room_code(), "[ROOM] stopped");
    }
}

impl Handler<Join> for RoomActor {
    type Result = Result<(), DomainError>;

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) -> Self::Result {
        self.flow.join(msg.player_id, &msg.name)?;

        let state = self.flow.state();
        let confirm = if msg.created {
            ServerMsg::RoomCreated {
                room_code: state.room_code.clone(),
                host_name: state.host_name.clone(),
            }
        } else {
            ServerMsg::JoinSuccess {
                room_code: state.room_code.clone(),
                host_name: state.host_name.clone(),
            }
        };
        Self::send_to(&msg.recipient, &confirm);
        self.members.insert(msg.player_id, msg.recipient);
        self.flush(ctx);
        Ok(())
    }
}

impl Handler<Leave> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) {
        self.members.remove(&msg.player_id);
        let outcome = self.flow.leave(msg.player_id);
        debug!(room_code = %self.flow.room_code(), player_id = %msg.player_id, ?outcome, "[ROOM] leave");
        if outcome != LeaveOutcome::NotInRoom {
            self.flush(ctx);
        }
    }
}

impl Handler<Act> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Act, ctx: &mut Self::Context) {
        // Dropped actions are logged by the flow; errors end the session.
        let _ = self.flow.apply(msg.player_id, msg.action);
        self.flush(ctx);
    }
}

impl Handler<Chat> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Chat, ctx: &mut Self::Context) {
        let timestamp_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        if self.flow.chat(msg.player_id, &msg.message, timestamp_ms) {
            self.flush(ctx);
        }
    }
}

impl Handler<Shutdown> for RoomActor {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) {
        self.close(ctx);
    }
}
