use actix_web::{test, web, App};
use seraph::middleware::request_log::{RequestLog, REQUEST_ID_HEADER};
use seraph::routes;
use seraph::state::app_state::AppState;

#[actix_web::test]
async fn health_reports_ok_and_room_count() {
    let state = AppState::for_tests();
    state.registry.create_room("Ann");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"], 1);
    assert!(body["app_version"].is_string());
}

#[actix_web::test]
async fn responses_carry_a_request_id() {
    let app = test::init_service(
        App::new()
            .wrap(RequestLog)
            .app_data(web::Data::new(AppState::for_tests()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("request id header");
    assert_eq!(id.len(), 32);
}
