use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{error, info};

use murmur_gateway::Dispatcher;
use murmur_store::AccountStore;
use murmur_types::api::{LoginRequest, LoginResponse, MessageBody, RegisterRequest};

use crate::error::ApiError;
use crate::tokens::TokenIssuer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountStore,
    pub tokens: TokenIssuer,
    pub dispatcher: Dispatcher,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageBody>, ApiError> {
    // Argon2 is CPU-bound; keep it off the async workers
    let s = state.clone();
    tokio::task::spawn_blocking(move || s.accounts.register(&req.username, &req.password))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })??;

    Ok(Json(MessageBody::new("Registered successfully")))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let s = state.clone();
    let username = req.username.clone();
    let verified = tokio::task::spawn_blocking(move || s.accounts.verify(&req.username, &req.password))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?;

    let account = match verified {
        Ok(account) => account,
        Err(e) => {
            info!("Failed login for {}", username);
            return Err(e.into());
        }
    };

    let token = state.tokens.issue(&account.username)?;
    info!("{} logged in", account.username);

    Ok(Json(LoginResponse { token }))
}
