//! Signed session cookie carrying the user id.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::errors::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn issue(user_id: Uuid, secret: &SecretString, ttl: Duration) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("session token encoding failed: {e}")))
}

/// Returns the user id of a valid, unexpired token.
pub fn verify(token: &str, secret: &SecretString) -> Option<Uuid> {
    let validation = Validation::new(Algorithm::HS256);
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .ok()?
    .claims;
    Uuid::parse_str(&claims.sub).ok()
}

/// Issues a token for `user_id` and wraps it in the session cookie.
pub fn login_cookie(user_id: Uuid, config: &SessionConfig) -> AppResult<Cookie<'static>> {
    let ttl = Duration::days(config.ttl_days);
    let token = issue(user_id, &config.secret, ttl)?;
    Ok(Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(ttl)
        .build())
}

/// Cookie whose removal clears the session.
pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
