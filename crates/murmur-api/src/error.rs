use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use murmur_store::AccountError;
use murmur_types::api::MessageBody;

use crate::tokens::TokenError;

/// Every failure the HTTP surface reports. The display text is the exact
/// `message` clients receive.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Username taken")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication error")]
    Unauthorized,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UsernameTaken | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateUsername => Self::UsernameTaken,
            AccountError::InvalidCredentials => Self::InvalidCredentials,
            AccountError::Hash(e) => {
                error!("Password hashing failed: {}", e);
                Self::Internal
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::Unauthorized,
            TokenError::Encode(e) => {
                error!("Token signing failed: {}", e);
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageBody::new(self.to_string()))).into_response()
    }
}
