use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::profile::ProfileRow;
use crate::models::resume::{ResumeListing, ResumeRow};
use crate::models::user::{NewUser, UserRow, MEMBER_GROUP};
use crate::store::{PortalStore, YearFilter};

const LISTING_SELECT: &str = r#"
    SELECT r.id AS resume_id, u.id AS user_id, u.first_name, u.last_name, u.email,
           p.class_year, r.file_key, r.updated_at
    FROM resumes r
    JOIN users u ON u.id = r.user_id
    LEFT JOIN profiles p ON p.user_id = u.id
"#;

#[derive(Clone)]
pub struct PgPortalStore {
    pool: PgPool,
}

impl PgPortalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl PortalStore for PgPortalStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRow>> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn user_groups(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT g.name
            FROM groups g
            JOIN user_groups ug ON ug.group_id = g.id
            WHERE ug.user_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_member(&self, new_user: NewUser) -> AppResult<UserRow> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("email {} is already registered", new_user.email))
            } else {
                AppError::Database(e)
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, class_year) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET class_year = EXCLUDED.class_year
            "#,
        )
        .bind(user.id)
        .bind(&new_user.class_year)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(MEMBER_GROUP)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_groups (user_id, group_id)
            SELECT $1, id FROM groups WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(MEMBER_GROUP)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }

    async fn add_to_group(&self, user_id: Uuid, group: &str) -> AppResult<bool> {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(group)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO user_groups (user_id, group_id)
            SELECT $1, id FROM groups WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(group)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_group(&self, user_id: Uuid, group: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_groups
            WHERE user_id = $1
              AND group_id = (SELECT id FROM groups WHERE name = $2)
            "#,
        )
        .bind(user_id)
        .bind(group)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn group_members(&self, group: &str) -> AppResult<Vec<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.*
            FROM users u
            JOIN user_groups ug ON ug.user_id = u.id
            JOIN groups g ON g.id = ug.group_id
            WHERE g.name = $1
            ORDER BY u.last_name, u.first_name
            "#,
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<ProfileRow>> {
        Ok(sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, class_year FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_resume(&self, user_id: Uuid) -> AppResult<Option<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_resume(
        &self,
        user_id: Uuid,
        file_key: &str,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ResumeRow> {
        // One row per user: the unique user_id turns a second upload into an update.
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, file_key, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET file_key = EXCLUDED.file_key, updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_key)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_resumes(&self, filter: &YearFilter) -> AppResult<Vec<ResumeListing>> {
        let rows = match filter {
            YearFilter::All => {
                sqlx::query_as::<_, ResumeListing>(LISTING_SELECT)
                    .fetch_all(&self.pool)
                    .await?
            }
            YearFilter::Years(years) => {
                let sql = format!("{LISTING_SELECT} WHERE p.class_year = ANY($1)");
                sqlx::query_as::<_, ResumeListing>(&sql)
                    .bind(years)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn resume_class_years(&self) -> AppResult<Vec<String>> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.class_year
            FROM profiles p
            JOIN resumes r ON r.user_id = p.user_id
            WHERE p.class_year IS NOT NULL AND p.class_year <> ''
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
