pub mod auth;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod tokens;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use tokens::{TokenError, TokenIssuer};
