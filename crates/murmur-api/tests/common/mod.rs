#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use tower::ServiceExt;

use murmur_api::{AppState, AppStateInner, TokenIssuer, routes};
use murmur_gateway::Dispatcher;
use murmur_store::{AccountStore, MessageLog};

pub const SECRET: &str = "test-secret";

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn test_state() -> AppState {
    test_state_with_heartbeat(Dispatcher::DEFAULT_HEARTBEAT_INTERVAL)
}

pub fn test_state_with_heartbeat(heartbeat: Duration) -> AppState {
    Arc::new(AppStateInner {
        accounts: AccountStore::new(),
        tokens: TokenIssuer::new(SECRET, chrono::Duration::seconds(TokenIssuer::DEFAULT_TTL_SECS)),
        dispatcher: Dispatcher::with_heartbeat(Arc::new(MessageLog::new()), heartbeat),
    })
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Serve the router on an ephemeral local port.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub async fn connect(addr: SocketAddr, token: &str) -> Client {
    let url = format!("ws://{}/gateway?token={}", addr, token);
    let (client, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    client
}

/// Next JSON event, skipping control frames.
pub async fn next_event(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed")
            .expect("websocket error");

        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Assert nothing arrives within a short window.
pub async fn expect_silence(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}

pub async fn say(client: &mut Client, text: &str) {
    let frame = serde_json::json!({ "type": "chat-message", "data": text }).to_string();
    client.send(Message::Text(frame.into())).await.unwrap();
}
