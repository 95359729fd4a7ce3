use anyhow::Context;
use axum::http::{HeaderValue, Method, header::{AUTHORIZATION, CONTENT_TYPE}};
use tower_http::cors::{AllowOrigin, CorsLayer};

use murmur_api::TokenIssuer;

/// Placeholder secret used when `MURMUR_JWT_SECRET` is unset.
pub const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// `*` allows any origin.
    pub cors_origin: String,
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("MURMUR_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_SECRET.into());
        let host = lookup("MURMUR_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("MURMUR_PORT")
            .unwrap_or_else(|| "4000".into())
            .parse()
            .context("MURMUR_PORT must be a port number")?;
        let cors_origin =
            lookup("MURMUR_CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into());
        let token_ttl_secs: i64 = match lookup("MURMUR_TOKEN_TTL_SECS") {
            Some(v) => v
                .parse()
                .context("MURMUR_TOKEN_TTL_SECS must be a whole number of seconds")?,
            None => TokenIssuer::DEFAULT_TTL_SECS,
        };
        if token_ttl_secs <= 0 {
            anyhow::bail!("MURMUR_TOKEN_TTL_SECS must be positive");
        }

        Ok(Self {
            jwt_secret,
            host,
            port,
            cors_origin,
            token_ttl_secs,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_SECRET
    }

    /// Host and port for `TcpListener::bind`. The host may be a name
    /// (`localhost`) or an IPv4/IPv6 literal; it is resolved at bind time.
    pub fn listen_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer::new(&self.jwt_secret, chrono::Duration::seconds(self.token_ttl_secs))
    }

    pub fn cors(&self) -> anyhow::Result<CorsLayer> {
        let origin = if self.cors_origin == "*" {
            AllowOrigin::any()
        } else {
            let value = HeaderValue::from_str(&self.cors_origin)
                .context("MURMUR_CORS_ORIGIN is not a valid header value")?;
            AllowOrigin::exact(value)
        };

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(false))
    }
}
