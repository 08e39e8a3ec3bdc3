//! In-memory implementations of `PortalStore` and `ObjectStore`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::profile::ProfileRow;
use crate::models::resume::{ResumeListing, ResumeRow};
use crate::models::user::{NewUser, UserRow, MEMBER_GROUP};
use crate::resumes::upload::resume_key;
use crate::store::{PortalStore, YearFilter};
use crate::test_utils::make_user;

#[derive(Default)]
struct PortalData {
    users: HashMap<Uuid, UserRow>,
    /// Membership rows in insertion order.
    memberships: Vec<(Uuid, String)>,
    profiles: HashMap<Uuid, ProfileRow>,
    resumes: HashMap<Uuid, ResumeRow>,
}

#[derive(Default)]
pub struct InMemoryPortalStore {
    data: Mutex<PortalData>,
}

impl InMemoryPortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user with no groups, profile or resume.
    pub fn insert_user(&self, user: UserRow) -> UserRow {
        self.data
            .lock()
            .unwrap()
            .users
            .insert(user.id, user.clone());
        user
    }

    pub fn set_class_year(&self, user_id: Uuid, class_year: Option<&str>) {
        self.data.lock().unwrap().profiles.insert(
            user_id,
            ProfileRow {
                user_id,
                class_year: class_year.map(str::to_string),
            },
        );
    }

    /// Every membership row of the user, duplicates included.
    pub fn groups_of(&self, user_id: Uuid) -> Vec<String> {
        self.data
            .lock()
            .unwrap()
            .memberships
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, group)| group.clone())
            .collect()
    }

    /// Adds a membership row unless it already exists. Returns whether one was added.
    pub fn grant(&self, user_id: Uuid, group: &str) -> bool {
        let mut data = self.data.lock().unwrap();
        if data
            .memberships
            .iter()
            .any(|(id, g)| *id == user_id && g == group)
        {
            return false;
        }
        data.memberships.push((user_id, group.to_string()));
        true
    }

    pub fn user_count(&self) -> usize {
        self.data.lock().unwrap().users.len()
    }

    pub fn resume_count(&self) -> usize {
        self.data.lock().unwrap().resumes.len()
    }

    /// A Member with a resume row under the usual key. A profile is only
    /// created when `class_year` is given.
    pub fn seed_resume(
        &self,
        first_name: &str,
        last_name: &str,
        class_year: Option<&str>,
    ) -> UserRow {
        let email = format!("{first_name}.{last_name}@example.com");
        let user = self.insert_user(make_user(&email, first_name, last_name));
        if class_year.is_some() {
            self.set_class_year(user.id, class_year);
        }

        self.grant(user.id, MEMBER_GROUP);
        self.data.lock().unwrap().resumes.insert(
            user.id,
            ResumeRow {
                id: Uuid::new_v4(),
                user_id: user.id,
                file_key: Some(resume_key(user.id, first_name, last_name)),
                updated_at: Utc::now(),
            },
        );
        user
    }
}

#[async_trait]
impl PortalStore for InMemoryPortalStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<UserRow>> {
        Ok(self.data.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .data
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn user_groups(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        let mut groups = self.groups_of(user_id);
        groups.sort();
        groups.dedup();
        Ok(groups)
    }

    async fn create_member(&self, new_user: NewUser) -> AppResult<UserRow> {
        let mut data = self.data.lock().unwrap();
        let email = new_user.email.to_lowercase();
        if data.users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let user = UserRow {
            id: Uuid::new_v4(),
            username: new_user.email.clone(),
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        data.users.insert(user.id, user.clone());
        data.profiles.insert(
            user.id,
            ProfileRow {
                user_id: user.id,
                class_year: Some(new_user.class_year),
            },
        );
        data.memberships.push((user.id, MEMBER_GROUP.to_string()));
        Ok(user)
    }

    async fn add_to_group(&self, user_id: Uuid, group: &str) -> AppResult<bool> {
        Ok(self.grant(user_id, group))
    }

    async fn remove_from_group(&self, user_id: Uuid, group: &str) -> AppResult<bool> {
        let mut data = self.data.lock().unwrap();
        let before = data.memberships.len();
        data.memberships
            .retain(|(id, g)| !(*id == user_id && g == group));
        Ok(data.memberships.len() != before)
    }

    async fn group_members(&self, group: &str) -> AppResult<Vec<UserRow>> {
        let data = self.data.lock().unwrap();
        let ids: HashSet<Uuid> = data
            .memberships
            .iter()
            .filter(|(_, g)| g == group)
            .map(|(id, _)| *id)
            .collect();
        let mut members: Vec<UserRow> = ids
            .iter()
            .filter_map(|id| data.users.get(id).cloned())
            .collect();
        members.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(members)
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<ProfileRow>> {
        Ok(self.data.lock().unwrap().profiles.get(&user_id).cloned())
    }

    async fn find_resume(&self, user_id: Uuid) -> AppResult<Option<ResumeRow>> {
        Ok(self.data.lock().unwrap().resumes.get(&user_id).cloned())
    }

    async fn save_resume(
        &self,
        user_id: Uuid,
        file_key: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ResumeRow> {
        let mut data = self.data.lock().unwrap();
        let row = data.resumes.entry(user_id).or_insert_with(|| ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            file_key: None,
            updated_at,
        });
        row.file_key = Some(file_key.to_string());
        row.updated_at = updated_at;
        Ok(row.clone())
    }

    async fn list_resumes(&self, filter: &YearFilter) -> AppResult<Vec<ResumeListing>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .resumes
            .values()
            .filter_map(|resume| {
                let user = data.users.get(&resume.user_id)?;
                let class_year = data
                    .profiles
                    .get(&user.id)
                    .and_then(|p| p.class_year.clone());
                filter
                    .matches(class_year.as_deref())
                    .then(|| ResumeListing {
                        resume_id: resume.id,
                        user_id: user.id,
                        first_name: user.first_name.clone(),
                        last_name: user.last_name.clone(),
                        email: user.email.clone(),
                        class_year,
                        file_key: resume.file_key.clone(),
                        updated_at: resume.updated_at,
                    })
            })
            .collect())
    }

    async fn resume_class_years(&self) -> AppResult<Vec<String>> {
        let data = self.data.lock().unwrap();
        let years: HashSet<String> = data
            .resumes
            .keys()
            .filter_map(|user_id| data.profiles.get(user_id)?.class_year.clone())
            .collect();
        Ok(years.into_iter().collect())
    }
}

/// Object store backed by a map. Keys registered with `fail_on` error on read.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::copy_from_slice(data));
    }

    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl crate::storage::ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<()> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<Bytes>> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(AppError::Storage(format!("simulated read failure for {key}")));
        }
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
