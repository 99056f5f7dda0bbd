use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use seraph::routes;
use seraph::state::app_state::AppState;
use seraph_test_support::problem_details::assert_problem_details_from_service_response;

#[actix_web::test]
async fn malformed_room_code_is_problem_details_400() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::for_tests()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/rooms/ab-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_ROOM_CODE",
        StatusCode::BAD_REQUEST,
        Some("room code"),
    )
    .await;
}
