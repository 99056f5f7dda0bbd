use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the lobby endpoints and the websocket upgrade.
///
/// Origins come from `CORS_ALLOWED_ORIGINS` (comma-separated); empty or
/// `null` entries are ignored. Falls back to localhost.
pub fn cors_middleware() -> Cors {
    let allowed_raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
    cors_for(&allowed_raw)
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.to_string())
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}

fn cors_for(raw: &str) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    for origin in parse_origins(raw) {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
