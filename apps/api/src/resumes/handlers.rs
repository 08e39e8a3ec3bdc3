use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{AuthUser, SessionUser};
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::upload::{
    store_resume, validate_upload, UploadedFile, MAX_RESUME_BYTES, PDF_CONTENT_TYPE,
    RESUME_FIELD,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeStatus {
    pub file_name: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub download_url: &'static str,
}

impl From<&ResumeRow> for ResumeStatus {
    fn from(row: &ResumeRow) -> Self {
        Self {
            file_name: row.file_name().map(str::to_string),
            updated_at: row.updated_at,
            download_url: "/me/resume.pdf",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MePage {
    pub user: SessionUser,
    pub class_year: Option<String>,
    /// `None` prompts the user to upload.
    pub resume: Option<ResumeStatus>,
}

#[derive(Debug, Serialize)]
pub struct UploadPage {
    pub field: &'static str,
    pub accepted_content_type: &'static str,
    pub max_bytes: usize,
    pub current: Option<ResumeStatus>,
}

/// GET /me/
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MePage>, AppError> {
    let resume = state.store.find_resume(user.id()).await?;
    let class_year = state
        .store
        .find_profile(user.id())
        .await?
        .and_then(|p| p.class_year);

    Ok(Json(MePage {
        resume: resume.as_ref().map(ResumeStatus::from),
        class_year,
        user,
    }))
}

/// GET /me/resume.pdf
///
/// Serves the caller's own stored PDF.
pub async fn handle_my_resume_file(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("You have not uploaded a resume yet".to_string());

    let resume = state.store.find_resume(user.id()).await?.ok_or_else(not_found)?;
    let key = resume.file_key.as_deref().ok_or_else(not_found)?;
    let data = state.objects.get(key).await?.ok_or_else(not_found)?;
    let disposition = format!(
        "inline; filename=\"{}\"",
        resume.file_name().unwrap_or("resume.pdf")
    );

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// GET /upload/
pub async fn handle_upload_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UploadPage>, AppError> {
    let current = state.store.find_resume(user.id()).await?;
    Ok(Json(UploadPage {
        field: RESUME_FIELD,
        accepted_content_type: PDF_CONTENT_TYPE,
        max_bytes: MAX_RESUME_BYTES,
        current: current.as_ref().map(ResumeStatus::from),
    }))
}

/// A body cut off by the transport limit is a 413; anything else is a
/// malformed request.
fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the {} MB limit",
            MAX_RESUME_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("Malformed upload: {}", err.body_text()))
    }
}

/// POST /upload/
///
/// Accepts one PDF under the `resume` field and replaces the caller's resume.
pub async fn handle_upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(upload_error)?;
        file = Some(UploadedFile { content_type, data });
    }

    let file = validate_upload(file).map_err(AppError::Form)?;
    store_resume(
        state.store.as_ref(),
        state.objects.as_ref(),
        &user.user,
        file.data,
        state.clock.now(),
    )
    .await?;

    Ok(Redirect::to("/me/"))
}
