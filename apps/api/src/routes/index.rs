use axum::Json;
use serde::Serialize;

use crate::auth::{is_board, MaybeUser};

#[derive(Debug, Serialize)]
pub struct Landing {
    pub service: &'static str,
    pub signed_in: bool,
    pub links: Vec<&'static str>,
}

/// GET /
/// Landing page; links depend on who is asking.
pub async fn index_handler(MaybeUser(user): MaybeUser) -> Json<Landing> {
    let mut links = Vec::new();
    match &user {
        None => links.extend(["/signup/", "/login/"]),
        Some(_) => links.extend(["/me/", "/upload/"]),
    }
    if is_board(user.as_ref()) {
        links.extend(["/board/", "/board/book.zip", "/board/manage/"]);
    }

    Json(Landing {
        service: "resume-book",
        signed_in: user.is_some(),
        links,
    })
}
