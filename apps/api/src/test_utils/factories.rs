//! Test data factories.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::clock::Clock;
use crate::models::resume::ResumeListing;
use crate::models::user::UserRow;
use crate::resumes::upload::resume_key;

/// A user whose username mirrors the email. The hash never verifies.
pub fn make_user(email: &str, first_name: &str, last_name: &str) -> UserRow {
    let email = email.to_lowercase();
    UserRow {
        id: Uuid::new_v4(),
        username: email.clone(),
        email,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password_hash: "unusable".to_string(),
        created_at: Utc::now(),
    }
}

/// A listing with a stored file under the owner's usual key.
pub fn make_listing(first_name: &str, last_name: &str, class_year: Option<&str>) -> ResumeListing {
    let user_id = Uuid::new_v4();
    ResumeListing {
        resume_id: Uuid::new_v4(),
        user_id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}.{}@example.com", first_name, last_name).to_lowercase(),
        class_year: class_year.map(str::to_string),
        file_key: Some(resume_key(user_id, first_name, last_name)),
        updated_at: Utc::now(),
    }
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Mid-October 2025: the active window is 2026..=2029.
    pub fn autumn_2025() -> Self {
        Self(Utc.with_ymd_and_hms(2025, 10, 16, 17, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
