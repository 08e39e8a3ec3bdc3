use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppResult, FieldErrors};
use crate::models::resume::ResumeRow;
use crate::models::user::UserRow;
use crate::names::resume_file_name;
use crate::storage::ObjectStore;
use crate::store::PortalStore;

pub const RESUME_FIELD: &str = "resume";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Inclusive upper bound on the file size.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// The file part of an upload as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Checks presence, exact content type, and size. Runs before any mutation.
pub fn validate_upload(file: Option<UploadedFile>) -> Result<UploadedFile, FieldErrors> {
    let Some(file) = file else {
        return Err(FieldErrors::single(RESUME_FIELD, "This field is required."));
    };
    if file.data.is_empty() {
        return Err(FieldErrors::single(
            RESUME_FIELD,
            "The submitted file is empty.",
        ));
    }
    if file.content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
        return Err(FieldErrors::single(
            RESUME_FIELD,
            "Only PDF files are allowed.",
        ));
    }
    if file.data.len() > MAX_RESUME_BYTES {
        return Err(FieldErrors::single(
            RESUME_FIELD,
            "File size must be under 10MB.",
        ));
    }
    Ok(file)
}

/// `resumes/{user_id}/{Last}_{First}_Resume.pdf`
pub fn resume_key(user_id: Uuid, first_name: &str, last_name: &str) -> String {
    format!(
        "resumes/{user_id}/{}",
        resume_file_name(first_name, last_name)
    )
}

/// Writes the file and points the user's single resume row at it.
///
/// The object write and the row upsert are separate steps; a failure between
/// them leaves the previous row in place.
pub async fn store_resume(
    store: &dyn PortalStore,
    objects: &dyn ObjectStore,
    user: &UserRow,
    data: Bytes,
    now: DateTime<Utc>,
) -> AppResult<ResumeRow> {
    let previous = store.find_resume(user.id).await?;
    let key = resume_key(user.id, &user.first_name, &user.last_name);

    objects.put(&key, data, PDF_CONTENT_TYPE).await?;
    let resume = store.save_resume(user.id, &key, now).await?;

    if let Some(old_key) = previous.and_then(|r| r.file_key) {
        if old_key != key {
            if let Err(e) = objects.delete(&old_key).await {
                warn!("Could not delete superseded resume {old_key}: {e}");
            }
        }
    }

    info!("Stored resume for user {} at {}", user.id, key);
    Ok(resume)
}
