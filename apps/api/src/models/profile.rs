use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One-to-one extension of a user. Not every user is guaranteed to have one.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub class_year: Option<String>,
}
