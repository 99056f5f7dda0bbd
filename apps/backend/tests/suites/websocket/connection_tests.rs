// Connection handshake and frame validation

use serde_json::json;
use seraph::state::app_state::AppState;

use crate::support::test_server::start_test_server;
use crate::support::websocket_client::WebSocketClient;

#[tokio::test]
async fn welcome_carries_a_player_id() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(AppState::for_tests()).await?;

    let mut client = WebSocketClient::connect_welcomed(&server.ws_url()).await?;
    let id = client.player_id.clone().expect("player id");
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    client.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn malformed_frames_get_bad_frame_and_keep_the_socket(
) -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(AppState::for_tests()).await?;
    let mut client = WebSocketClient::connect_welcomed(&server.ws_url()).await?;

    client.send("not json").await?;
    let err = client.recv_json().await?;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "BAD_FRAME");

    client.send_json(&json!({"type": "list_rooms"})).await?;
    let list = client.recv_json().await?;
    assert_eq!(list["type"], "room_list");

    client.close().await?;
    server.stop().await;
    Ok(())
}

#[tokio::test]
async fn actions_before_joining_are_refused() -> Result<(), Box<dyn std::error::Error>> {
    let server = start_test_server(AppState::for_tests()).await?;
    let mut client = WebSocketClient::connect_welcomed(&server.ws_url()).await?;

    client.send_json(&json!({"type": "vote", "approve": true})).await?;
    let err = client.recv_json().await?;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "NOT_IN_ROOM");

    client.close().await?;
    server.stop().await;
    Ok(())
}
