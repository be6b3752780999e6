use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, ProfileUpdate, StoreError, User};

/// Persistence seam for user accounts.
///
/// Uniqueness of `username` and `email` is the store's responsibility; any
/// write that would break it must fail with [`StoreError::Duplicate`] even
/// when callers pre-checked.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    /// Another user (not `exclude`) already holding the given username or email.
    async fn find_conflicting(
        &self,
        exclude: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError>;
    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or("unique constraint").to_string();
            return StoreError::Duplicate(constraint);
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, is_admin, is_active, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(write_error)
    }

    async fn find_conflicting(
        &self,
        exclude: Uuid,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, is_active, created_at
            FROM users
            WHERE id <> $1
              AND (($2::text IS NOT NULL AND username = $2)
                OR ($3::text IS NOT NULL AND email = $3))
            LIMIT 1
            "#,
        )
        .bind(exclude)
        .bind(username)
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET username = COALESCE($2, username),
                   email = COALESCE($3, email)
             WHERE id = $1
            RETURNING id, username, email, password_hash, is_admin, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(update.username.as_deref())
        .bind(update.email.as_deref())
        .fetch_optional(&self.db)
        .await
        .map_err(write_error)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE id = $1"#)
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, is_active, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
