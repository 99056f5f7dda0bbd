use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every endpoint. Shared by `main.rs` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Room listing: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Websocket upgrade: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
