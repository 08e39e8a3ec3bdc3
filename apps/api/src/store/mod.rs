//! Relational store behind a trait so handlers never see a connection pool.
//!
//! Production uses [`postgres::PgPortalStore`]. `AppState` holds an
//! `Arc<dyn PortalStore>`; tests swap in an in-memory implementation.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::profile::ProfileRow;
use crate::models::resume::{ResumeListing, ResumeRow};
use crate::models::user::{NewUser, UserRow};

/// Which resumes a Board read should include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearFilter {
    /// Every resume, including owners without a class year.
    All,
    /// Only owners whose profile class year is one of these.
    Years(Vec<String>),
}

impl YearFilter {
    /// An empty `years` list means the caller selected nothing explicit.
    pub fn from_selection(years: &[String]) -> Option<Self> {
        if years.is_empty() {
            None
        } else {
            Some(YearFilter::Years(years.to_vec()))
        }
    }

    #[cfg(test)]
    pub fn matches(&self, class_year: Option<&str>) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Years(years) => {
                class_year.is_some_and(|year| years.iter().any(|y| y == year))
            }
        }
    }
}

#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<UserRow>>;

    /// Case-insensitive lookup.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>>;

    async fn user_groups(&self, user_id: Uuid) -> AppResult<Vec<String>>;

    /// Creates the user, its profile, and its "Member" membership atomically.
    /// Returns `AppError::Conflict` when the email is already taken.
    async fn create_member(&self, new_user: NewUser) -> AppResult<UserRow>;

    /// Returns `false` when the user already belonged to the group.
    async fn add_to_group(&self, user_id: Uuid, group: &str) -> AppResult<bool>;

    /// Returns `false` when the user was not in the group.
    async fn remove_from_group(&self, user_id: Uuid, group: &str) -> AppResult<bool>;

    /// Members ordered by last name, then first name.
    async fn group_members(&self, group: &str) -> AppResult<Vec<UserRow>>;

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<ProfileRow>>;

    async fn find_resume(&self, user_id: Uuid) -> AppResult<Option<ResumeRow>>;

    /// Creates the user's resume row or updates the existing one in place.
    async fn save_resume(
        &self,
        user_id: Uuid,
        file_key: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ResumeRow>;

    /// Unordered; callers apply the Board ordering.
    async fn list_resumes(&self, filter: &YearFilter) -> AppResult<Vec<ResumeListing>>;

    /// Distinct class years of users who have a resume. Unordered.
    async fn resume_class_years(&self) -> AppResult<Vec<String>>;
}
