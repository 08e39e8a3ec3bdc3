//! Axum route handlers for signup, login and logout.

use axum::{
    extract::{Query, State},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accounts::forms::{CleanSignup, LoginForm, SignupForm};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::session::{login_cookie, logout_cookie};
use crate::class_year::current_class_years;
use crate::errors::{AppError, FieldErrors, NON_FIELD_ERRORS};
use crate::models::user::NewUser;
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "This email is already registered.";
const BAD_CREDENTIALS: &str = "Please enter a correct email and password.";

#[derive(Debug, Serialize)]
pub struct SignupPage {
    pub fields: Vec<&'static str>,
    pub class_year_choices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

/// GET /signup/
pub async fn handle_signup_page(State(state): State<AppState>) -> Json<SignupPage> {
    Json(SignupPage {
        fields: vec![
            "first_name",
            "last_name",
            "email",
            "password1",
            "password2",
            "class_year",
        ],
        class_year_choices: current_class_years(state.clock.now(), &state.config.class_years),
    })
}

/// POST /signup/
///
/// Creates the account, its profile and its Member membership, signs the new
/// user in, and sends them to their resume page.
pub async fn handle_signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let choices = current_class_years(state.clock.now(), &state.config.class_years);
    let clean = form.clean(&choices).map_err(AppError::Form)?;

    if state.store.find_user_by_email(&clean.email).await?.is_some() {
        return Err(AppError::Form(FieldErrors::single("email", DUPLICATE_EMAIL)));
    }

    let CleanSignup {
        first_name,
        last_name,
        email,
        password,
        class_year,
    } = clean;
    let password_hash = hash_password_blocking(password).await?;

    let user = state
        .store
        .create_member(NewUser {
            email,
            first_name,
            last_name,
            password_hash,
            class_year,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent signup for the same address.
            AppError::Conflict(_) => AppError::Form(FieldErrors::single("email", DUPLICATE_EMAIL)),
            other => other,
        })?;

    info!("User {} signed up", user.id);
    let jar = jar.add(login_cookie(user.id, &state.config.session)?);
    Ok((jar, Redirect::to("/me/")))
}

/// GET /login/
pub async fn handle_login_page() -> Json<LoginPage> {
    Json(LoginPage {
        fields: vec!["username", "password"],
    })
}

/// POST /login/
pub async fn handle_login(
    State(state): State<AppState>,
    Query(params): Query<NextParam>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let bad_credentials =
        || AppError::Form(FieldErrors::single(NON_FIELD_ERRORS, BAD_CREDENTIALS));

    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(bad_credentials());
    }
    let Some(user) = state.store.find_user_by_email(&form.username).await? else {
        return Err(bad_credentials());
    };
    if !verify_password_blocking(form.password, user.password_hash.clone()).await? {
        return Err(bad_credentials());
    }

    info!("User {} logged in", user.id);
    let jar = jar.add(login_cookie(user.id, &state.config.session)?);
    let target = params
        .next
        .filter(|next| is_local_path(next))
        .unwrap_or_else(|| "/me/".to_string());
    Ok((jar, Redirect::to(&target)))
}

/// POST /logout/
pub async fn handle_logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(logout_cookie()), Redirect::to("/"))
}

/// Only same-site absolute paths are followed after login.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}
