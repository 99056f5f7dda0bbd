use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::roster::PlayerId;
use crate::domain::roster::validate_name;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;
use crate::ws::hub::{normalize_room_code, SessionRegistry};
use crate::ws::protocol::{ClientMsg, ServerMsg};
use crate::ws::room::{Act, Chat, Deliver, Join, Leave, RoomActor};
use crate::AppError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state.registry.clone());
    ws::start(session, &req, stream)
}

/// Which outcome frame a failed join reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Create,
    Join,
}

pub struct WsSession {
    /// Doubles as the player id in whatever room this connection joins.
    conn_id: PlayerId,
    registry: Arc<SessionRegistry>,
    room: Option<(String, Addr<RoomActor>)>,
    /// A join request is in flight; further create/join requests are refused.
    joining: bool,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(conn_id: PlayerId, registry: Arc<SessionRegistry>) -> Self {
        Self {
            conn_id,
            registry,
            room: None,
            joining: false,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
    }

    fn send_join_failure(ctx: &mut ws::WebsocketContext<Self>, kind: JoinKind, err: DomainError) {
        let err = AppError::from(err);
        let (code, message) = (err.code(), err.detail());
        let msg = match kind {
            JoinKind::Create => ServerMsg::RoomCreateFailed { code, message },
            JoinKind::Join => ServerMsg::JoinFailed { code, message },
        };
        Self::send_json(ctx, &msg);
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn seated_guard(&self, kind: JoinKind, ctx: &mut ws::WebsocketContext<Self>) -> bool {
        if self.room.is_some() || self.joining {
            Self::send_join_failure(
                ctx,
                kind,
                DomainError::conflict(ConflictKind::AlreadyInRoom, "connection already seated in a room"),
            );
            return false;
        }
        true
    }

    fn enter_room(
        &mut self,
        kind: JoinKind,
        room_code: String,
        addr: Addr<RoomActor>,
        name: String,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        self.joining = true;
        let join = Join {
            player_id: self.conn_id,
            name,
            recipient: ctx.address().recipient(),
            created: kind == JoinKind::Create,
        };
        let target = addr.clone();

        // Hold other frames until the room answers so actions cannot race the join.
        ctx.wait(addr.send(join).into_actor(self).map(move |res, actor, ctx| {
            actor.joining = false;
            match res {
                Ok(Ok(())) => {
                    info!(conn_id = %actor.conn_id, room_code = %room_code, "[WS SESSION] joined room");
                    actor.room = Some((room_code, target));
                }
                Ok(Err(err)) => {
                    if kind == JoinKind::Create {
                        // Created for this connection only; nobody else can be seated.
                        actor.registry.remove(&room_code);
                        target.do_send(Shutdown);
                    }
                    Self::send_join_failure(ctx, kind, err);
                }
                Err(mailbox) => {
                    warn!(conn_id = %actor.conn_id, room_code = %room_code, error = %mailbox, "[WS SESSION] room unreachable");
                    Self::send_join_failure(
                        ctx,
                        kind,
                        DomainError::not_found(
                            NotFoundKind::Room,
                            format!("room {room_code} is no longer available"),
                        ),
                    );
                }
            }
        }));
    }

    fn handle_client(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        if let Some(action) = cmd.action() {
            match &self.room {
                Some((_, addr)) => addr.do_send(Act {
                    player_id: self.conn_id,
                    action,
                }),
                None => Self::send_error(ctx, ErrorCode::NotInRoom, "join a room first"),
            }
            return;
        }

        match cmd {
            ClientMsg::CreateRoom { player_name } => {
                if !self.seated_guard(JoinKind::Create, ctx) {
                    return;
                }
                let host_name = match validate_name(&player_name) {
                    Ok(name) => name,
                    Err(err) => {
                        Self::send_join_failure(ctx, JoinKind::Create, err);
                        return;
                    }
                };
                let (room_code, addr) = self.registry.create_room(&host_name);
                self.enter_room(JoinKind::Create, room_code, addr, host_name, ctx);
            }
            ClientMsg::JoinRoom {
                room_code,
                player_name,
            } => {
                if !self.seated_guard(JoinKind::Join, ctx) {
                    return;
                }
                let entry = normalize_room_code(&room_code).and_then(|code| {
                    self.registry.require(&code).map(|entry| (code, entry))
                });
                match entry {
                    Ok((code, entry)) => self.enter_room(JoinKind::Join, code, entry.addr, player_name, ctx),
                    Err(err) => Self::send_join_failure(ctx, JoinKind::Join, err),
                }
            }
            ClientMsg::ListRooms => {
                let rooms = self.registry.joinable_rooms();
                Self::send_json(ctx, &ServerMsg::RoomList { rooms });
            }
            ClientMsg::Chat { message } => match &self.room {
                Some((_, addr)) => addr.do_send(Chat {
                    player_id: self.conn_id,
                    message,
                }),
                None => Self::send_error(ctx, ErrorCode::NotInRoom, "join a room first"),
            },
            ClientMsg::Nominate { .. }
            | ClientMsg::Vote { .. }
            | ClientMsg::SelectToken { .. }
            | ClientMsg::Kill { .. }
            | ClientMsg::GuessGod { .. } => {}
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        Self::send_json(
            ctx,
            &ServerMsg::Welcome {
                player_id: self.conn_id,
            },
        );
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some((_, addr)) = self.room.take() {
            addr.do_send(Leave {
                player_id: self.conn_id,
            });
        }
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.handle_client(cmd, ctx),
                    Err(err) => {
                        warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed frame");
                        Self::send_error(ctx, ErrorCode::BadFrame, "malformed message");
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadFrame, "binary frames are not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) {
        match msg {
            Deliver::Frame(payload) => ctx.text(&*payload),
            Deliver::Closed { room_code } => {
                if self.room.as_ref().is_some_and(|(code, _)| *code == room_code) {
                    info!(conn_id = %self.conn_id, room_code = %room_code, "[WS SESSION] room closed");
                    self.room = None;
                }
            }
        }
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) {
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
