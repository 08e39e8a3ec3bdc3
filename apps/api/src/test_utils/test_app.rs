//! Full-router harness for HTTP-level tests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum_extra::extract::cookie::Cookie;
use bytes::Bytes;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::password::hash_password;
use crate::auth::session::{issue, SESSION_COOKIE};
use crate::config::{ClassYearConfig, Config, SessionConfig};
use crate::models::user::{UserRow, BOARD_GROUP, MEMBER_GROUP};
use crate::resumes::upload::resume_key;
use crate::routes::build_router;
use crate::state::AppState;
use crate::test_utils::{make_user, FixedClock, InMemoryObjectStore, InMemoryPortalStore};

const MULTIPART_BOUNDARY: &str = "resume-book-test-boundary";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        s3_bucket: "unused".to_string(),
        s3_endpoint: "http://unused".to_string(),
        aws_access_key_id: "unused".to_string(),
        aws_secret_access_key: "unused".to_string(),
        session: SessionConfig {
            secret: SecretString::from("test-session-secret-of-at-least-32-bytes".to_string()),
            ttl_days: 1,
            cookie_secure: false,
        },
        class_years: ClassYearConfig::default(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// In-memory state plus handles to the concrete mocks for assertions.
pub struct TestApp {
    pub store: Arc<InMemoryPortalStore>,
    pub objects: Arc<InMemoryObjectStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryPortalStore::new());
        let objects = Arc::new(InMemoryObjectStore::new());
        let config = test_config();
        let state = AppState {
            store: store.clone(),
            objects: objects.clone(),
            clock: Arc::new(FixedClock::autumn_2025()),
            cookie_key: config.session.cookie_key().unwrap(),
            config: Arc::new(config),
        };
        Self {
            store,
            objects,
            state,
        }
    }

    // ── Seeding ────────────────────────────────────────────────────────────

    pub fn create_member(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        class_year: Option<&str>,
    ) -> UserRow {
        self.insert_member(make_user(email, first_name, last_name), class_year)
    }

    pub fn create_member_with_password(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> UserRow {
        let mut user = make_user(email, first_name, last_name);
        user.password_hash = hash_password(password).unwrap();
        self.insert_member(user, Some("2026"))
    }

    pub fn create_board_member(&self, email: &str) -> UserRow {
        let user = self.create_member(email, "Board", "Member", None);
        self.store.grant(user.id, BOARD_GROUP);
        user
    }

    /// A seeded resume whose object actually exists.
    pub fn seed_uploaded_resume(
        &self,
        first_name: &str,
        last_name: &str,
        class_year: Option<&str>,
        data: &[u8],
    ) -> UserRow {
        let user = self.store.seed_resume(first_name, last_name, class_year);
        self.objects
            .insert(&resume_key(user.id, first_name, last_name), data);
        user
    }

    fn insert_member(&self, user: UserRow, class_year: Option<&str>) -> UserRow {
        let user = self.store.insert_user(user);
        if class_year.is_some() {
            self.store.set_class_year(user.id, class_year);
        }
        self.store.grant(user.id, MEMBER_GROUP);
        user
    }

    /// `session=<token>` for the user.
    pub fn cookie_for(&self, user: &UserRow) -> String {
        let token = issue(
            user.id,
            &self.state.config.session.secret,
            time::Duration::days(1),
        )
        .unwrap();
        format!("{SESSION_COOKIE}={token}")
    }

    // ── Requests ───────────────────────────────────────────────────────────

    pub async fn send(&self, request: Request<Body>) -> Response {
        build_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let request = with_cookie(Request::builder().method(Method::GET).uri(uri), cookie)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let request = with_cookie(Request::builder().method(Method::POST).uri(uri), cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        content_type: &str,
        body: Vec<u8>,
        cookie: Option<&str>,
    ) -> Response {
        let request = with_cookie(Request::builder().method(Method::POST).uri(uri), cookie)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    // ── Response helpers ───────────────────────────────────────────────────

    /// `name=value` of a non-empty cookie set by the response.
    pub fn cookie_pair(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
            .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
    }

    pub fn session_cookie(response: &Response) -> Option<String> {
        Self::cookie_pair(response, SESSION_COOKIE)
    }
}

fn with_cookie(
    builder: axum::http::request::Builder,
    cookie: Option<&str>,
) -> axum::http::request::Builder {
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

pub async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// One-file `multipart/form-data` body. Returns the content type and bytes.
pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
