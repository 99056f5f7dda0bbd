//! Read-only room listing over HTTP. Joining happens over the websocket.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::ws::hub::normalize_room_code;

/// GET /api/rooms
///
/// Rooms that have not started and still have a free seat.
async fn list_rooms(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.registry.joinable_rooms()))
}

/// GET /api/rooms/{code}
async fn get_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = normalize_room_code(&path.into_inner())?;
    let entry = app_state.registry.require(&code)?;
    Ok(HttpResponse::Ok().json(entry.summary()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_rooms))
        .route("/{code}", web::get().to(get_room));
}
