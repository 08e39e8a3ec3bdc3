use axum::{extract::State, Json};
use serde::Serialize;

use crate::class_year::current_class_years;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub time_zone: String,
    /// Window offered at signup right now; shows whether the rollover moved.
    pub class_years: Vec<String>,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<Health> {
    let class_years = &state.config.class_years;
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        time_zone: class_years.time_zone.to_string(),
        class_years: current_class_years(state.clock.now(), class_years),
    })
}
