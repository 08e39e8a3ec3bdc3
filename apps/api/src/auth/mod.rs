//! Sessions and the group-based authorization gate.
//!
//! Every Board-only route takes a [`BoardUser`] extractor; it is the only place
//! that evaluates [`is_board`].

pub mod password;
pub mod session;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{UserRow, BOARD_GROUP};
use crate::state::AppState;

/// The signed-in user with their current group memberships.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    #[serde(flatten)]
    pub user: UserRow,
    pub groups: Vec<String>,
}

impl SessionUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// True iff someone is signed in and belongs to the Board group.
pub fn is_board(user: Option<&SessionUser>) -> bool {
    user.is_some_and(|u| u.in_group(BOARD_GROUP))
}

/// The current user, if any. Invalid or expired sessions read as anonymous.
pub struct MaybeUser(pub Option<SessionUser>);

/// Rejects anonymous requests with 401.
pub struct AuthUser(pub SessionUser);

/// Rejects anonymous requests with 401 and non-Board users with 403.
pub struct BoardUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(user_id) = jar
            .get(session::SESSION_COOKIE)
            .and_then(|c| session::verify(c.value(), &state.config.session.secret))
        else {
            return Ok(MaybeUser(None));
        };

        // Loaded per request so group changes apply immediately.
        let Some(user) = state.store.find_user_by_id(user_id).await? else {
            return Ok(MaybeUser(None));
        };
        let groups = state.store.user_groups(user.id).await?;
        Ok(MaybeUser(Some(SessionUser { user, groups })))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BoardUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) if is_board(Some(&user)) => Ok(BoardUser(user)),
            Some(_) => Err(AppError::Forbidden),
            None => Err(AppError::Unauthorized),
        }
    }
}
