use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::clock::Clock;
use crate::config::Config;
use crate::storage::ObjectStore;
use crate::store::PortalStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users, groups, profiles and resume rows. Default: `PgPortalStore`.
    pub store: Arc<dyn PortalStore>,
    /// Resume file bytes. Default: `S3ObjectStore`.
    pub objects: Arc<dyn ObjectStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
    /// Signs the flash cookie.
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
