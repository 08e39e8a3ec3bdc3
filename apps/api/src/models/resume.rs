use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// The single current resume of one user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Object-store key. `None` when the row exists but no file was ever stored.
    pub file_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Final path segment of the object key.
    pub fn file_name(&self) -> Option<&str> {
        self.file_key
            .as_deref()
            .and_then(|key| key.rsplit('/').next())
    }
}

/// A resume joined with its owner and the owner's class year, as read by the
/// Board list and the export.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeListing {
    pub resume_id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_year: Option<String>,
    pub file_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}
