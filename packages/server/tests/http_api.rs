//! HTTP inspection API.

mod common;

use common::{TestClient, TestServer};
use serde_json::{Value, json};

#[tokio::test]
async fn test_root_banner_and_health() {
    // テスト項目: / はバナー文字列、/api/health は {"status":"ok"} を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let banner = reqwest::get(server.http_url("/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let health: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(banner, "Video Sync Backend Running");
    assert_eq!(health, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_rooms_listed_in_id_order() {
    // テスト項目: /api/rooms が Room の概要を ID 順で返す
    // given (前提条件):
    let server = TestServer::start().await;
    let (_host, _) = TestClient::join(&server, "room-b", "host", "hoster").await;
    let (_viewer, _) = TestClient::join(&server, "room-a", "viewer", "alice").await;

    // when (操作):
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["id"], "room-a");
    assert_eq!(rooms[0]["hasHost"], false);
    assert_eq!(rooms[0]["viewerCount"], 1);
    assert_eq!(rooms[1]["id"], "room-b");
    assert_eq!(rooms[1]["hasHost"], true);
    assert_eq!(rooms[1]["isPlaying"], false);
    assert!(rooms[1]["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_room_detail_and_not_found() {
    // テスト項目: /api/rooms/{id} が詳細を返し、存在しない Room は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let (_host, host_id) = TestClient::join(&server, "R1", "host", "hoster").await;

    // when (操作):
    let detail = server.room("R1").await.unwrap();
    let missing = reqwest::get(server.http_url("/api/rooms/nope")).await.unwrap();

    // then (期待する結果):
    assert_eq!(detail["id"], "R1");
    assert_eq!(detail["host"], json!({"id": host_id, "username": "hoster"}));
    assert_eq!(detail["viewers"], json!([]));
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    // テスト項目: 任意のオリジンからのリクエストに CORS ヘッダが付与される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(server.http_url("/api/health"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
