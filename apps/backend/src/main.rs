use actix_web::{web, App, HttpServer};
use seraph::config::{GameConfig, ServerConfig};
use seraph::middleware::cors::cors_middleware;
use seraph::middleware::request_log::RequestLog;
use seraph::routes;
use seraph::state::app_state::AppState;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let server = match ServerConfig::from_env() {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let game = GameConfig::default();
    if let Err(e) = game.validate() {
        eprintln!("❌ Invalid game configuration: {e}");
        std::process::exit(1);
    }

    let (host, port) = (server.host.clone(), server.port);
    info!(%host, port, seeded = server.seed.is_some(), "Starting Seraph backend");

    let data = web::Data::new(AppState::new(game, server));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestLog)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
