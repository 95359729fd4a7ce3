use axum::{
    extract::{
        Query, State, WebSocketUpgrade,
        rejection::QueryRejection,
        ws::rejection::WebSocketUpgradeRejection,
    },
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use murmur_gateway::connection;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::tokens::TokenIssuer;

#[derive(Debug, Deserialize)]
pub struct GatewayQuery {
    pub token: Option<String>,
}

/// Token from `?token=` or, failing that, `Authorization: Bearer`.
fn presented_token<'a>(query: &'a GatewayQuery, headers: &'a HeaderMap) -> Option<&'a str> {
    query.token.as_deref().or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
    })
}

fn authenticate(
    tokens: &TokenIssuer,
    query: &GatewayQuery,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let token = presented_token(query, headers).ok_or(ApiError::Unauthorized)?;
    Ok(tokens.verify(token)?)
}

/// Authenticate before upgrading: a refused handshake never opens a socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    query: Result<Query<GatewayQuery>, QueryRejection>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let authenticated = match query {
        Ok(Query(query)) => authenticate(&state.tokens, &query, &headers),
        Err(_) => Err(ApiError::Unauthorized),
    };
    let username = match authenticated {
        Ok(username) => username,
        Err(e) => {
            warn!("Rejected gateway handshake: {}", e);
            return e.into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher, username))
}
