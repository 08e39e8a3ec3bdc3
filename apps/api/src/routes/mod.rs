pub mod health;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::board::handlers as board;
use crate::resumes::handlers as resumes;
use crate::resumes::upload::MAX_RESUME_BYTES;
use crate::state::AppState;

/// Headroom above the file limit for multipart framing, so a file just over
/// the limit is rejected by validation rather than by the body limit.
const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route(
            "/signup/",
            get(accounts::handle_signup_page).post(accounts::handle_signup),
        )
        .route(
            "/login/",
            get(accounts::handle_login_page).post(accounts::handle_login),
        )
        .route("/logout/", post(accounts::handle_logout))
        // Member pages
        .route("/me/", get(resumes::handle_me))
        .route("/me/resume.pdf", get(resumes::handle_my_resume_file))
        .route(
            "/upload/",
            get(resumes::handle_upload_page)
                .post(resumes::handle_upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Board pages
        .route("/board/", get(board::handle_board_list))
        .route("/board/book.zip", get(board::handle_book_zip))
        .route(
            board::MANAGE_PATH,
            get(board::handle_manage_page).post(board::handle_manage),
        )
        .with_state(state)
}
