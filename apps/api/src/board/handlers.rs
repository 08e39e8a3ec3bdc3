//! Axum route handlers for the Board pages.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::{Query, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::auth::BoardUser;
use crate::board::export::{build_archive, collect_entries, BOOK_FILE_NAME};
use crate::board::listing::{clean_year_params, load_board_view, load_resumes, BoardView};
use crate::board::membership::{
    apply_action, board_members, BoardMember, ManageAction, ManageForm,
};
use crate::class_year::current_class_years;
use crate::errors::AppError;
use crate::flash::{self, FlashMessage};
use crate::state::AppState;
use crate::store::YearFilter;

pub const MANAGE_PATH: &str = "/board/manage/";

/// `?years=2026&years=2027`
#[derive(Debug, Default, Deserialize)]
pub struct YearsQuery {
    #[serde(default)]
    pub years: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ManagePage {
    pub board_members: Vec<BoardMember>,
    pub messages: Vec<FlashMessage>,
}

/// GET /board/
///
/// Resumes filtered by class year. Without `years` the active window is shown.
pub async fn handle_board_list(
    State(state): State<AppState>,
    BoardUser(_): BoardUser,
    Query(query): Query<YearsQuery>,
) -> Result<Json<BoardView>, AppError> {
    let years_active = current_class_years(state.clock.now(), &state.config.class_years);
    let view = load_board_view(state.store.as_ref(), years_active, &query.years).await?;
    Ok(Json(view))
}

/// GET /board/book.zip
///
/// Without `years` every resume is exported, whatever its class year.
pub async fn handle_book_zip(
    State(state): State<AppState>,
    BoardUser(_): BoardUser,
    Query(query): Query<YearsQuery>,
) -> Result<Response, AppError> {
    let filter = YearFilter::from_selection(&clean_year_params(&query.years))
        .unwrap_or(YearFilter::All);

    let listings = load_resumes(state.store.as_ref(), &filter).await?;
    let entries = collect_entries(state.objects.as_ref(), &listings).await;
    let archive = tokio::task::spawn_blocking(move || build_archive(&entries))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("zip task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{BOOK_FILE_NAME}\""),
            ),
        ],
        archive,
    )
        .into_response())
}

/// GET /board/manage/
pub async fn handle_manage_page(
    State(state): State<AppState>,
    BoardUser(_): BoardUser,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<ManagePage>), AppError> {
    let board_members = board_members(state.store.as_ref()).await?;
    let (jar, messages) = flash::take(jar);
    Ok((
        jar,
        Json(ManagePage {
            board_members,
            messages,
        }),
    ))
}

/// POST /board/manage/
///
/// Adds or removes one Board member, then redirects back to the page with
/// the outcome as a flash message.
pub async fn handle_manage(
    State(state): State<AppState>,
    BoardUser(caller): BoardUser,
    jar: SignedCookieJar,
    Form(form): Form<ManageForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let message = apply_action(state.store.as_ref(), &caller, ManageAction::from(form)).await?;
    Ok((flash::push(jar, message), Redirect::to(MANAGE_PATH)))
}
