// Room creation, joining and listing

use serde_json::json;
use seraph::state::app_state::AppState;

use crate::support::test_server::start_test_server;
use crate::support::websocket_client::WebSocketClient;

#[tokio::test]
async fn create_then_join_confirms_before_roster_updates(
) -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(AppState::for_tests()).await?;

    let mut host = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    let created = host.create_room("Ann").await?;
    assert_eq!(created["type"], "room_created");
    assert_eq!(created["host_name"], "Ann");
    let code = created["room_code"].as_str().unwrap().to_string();

    let waiting = host.recv_event("waiting_for_players").await?;
    assert_eq!(waiting["current"], 1);
    assert_eq!(waiting["max"], 5);

    let mut guest = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    let joined = guest.join_room(&code.to_lowercase(), "Bob").await?;
    assert_eq!(joined["type"], "join_success");
    assert_eq!(joined["room_code"], code.as_str());

    let waiting = guest.recv_event("waiting_for_players").await?;
    assert_eq!(waiting["current"], 2);
    let first = host.recv_event("player_list").await?;
    assert_eq!(first["players"].as_array().unwrap().len(), 1);
    let players = host.recv_event("player_list").await?;
    let names: Vec<&str> = players["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ann", "Bob"]);

    host.close().await?;
    guest.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn join_rejections_carry_stable_codes() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(AppState::for_tests()).await?;

    let mut host = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    let created = host.create_room("Ann").await?;
    let code = created["room_code"].as_str().unwrap().to_string();

    let mut guest = WebSocketClient::connect_welcomed(&server.ws_url()).await?;

    let failed = guest.join_room("QQQQQQ", "Bob").await?;
    assert_eq!(failed["type"], "join_failed");
    assert_eq!(failed["code"], "ROOM_NOT_FOUND");

    let failed = guest.join_room("nope", "Bob").await?;
    assert_eq!(failed["code"], "INVALID_ROOM_CODE");

    let failed = guest.join_room(&code, "Ann").await?;
    assert_eq!(failed["code"], "NAME_TAKEN");

    let failed = guest.join_room(&code, "   ").await?;
    assert_eq!(failed["code"], "INVALID_PLAYER_NAME");

    let failed = host.join_room(&code, "Ann2").await?;
    assert_eq!(failed["type"], "join_failed");
    assert_eq!(failed["code"], "ALREADY_IN_ROOM");

    host.close().await?;
    guest.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn room_list_shows_open_rooms_only() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::for_tests();
    let registry = state.registry.clone();
    let server = start_test_server(state).await?;

    let mut host = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    let created = host.create_room("Ann").await?;
    let code = created["room_code"].as_str().unwrap().to_string();

    let mut browser = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    browser.send_json(&json!({"type": "list_rooms"})).await?;
    let list = browser.recv_json().await?;
    assert_eq!(list["type"], "room_list");
    assert_eq!(list["rooms"][0]["room_code"], code.as_str());
    assert_eq!(list["rooms"][0]["player_count"], 1);

    // Last player out tears the room down.
    host.close().await?;
    for _ in 0..100 {
        if registry.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(registry.is_empty());

    browser.send_json(&json!({"type": "list_rooms"})).await?;
    let list = browser.recv_json().await?;
    assert_eq!(list["rooms"], json!([]));

    browser.close().await?;
    server.stop().await;
    Ok(())
}
