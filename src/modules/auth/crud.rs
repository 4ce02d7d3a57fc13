use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::interface::{AuthError, Result, UserStore};
use super::model::User;

pub struct MySqlUserStore {
    pool: Pool<MySql>,
}

impl MySqlUserStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AuthError::DuplicateUser;
        }
    }
    AuthError::Database(e.to_string())
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, full_name, email, phone_number, password_hash, role,
                profile_picture, is_verified, verification_token,
                verification_token_expires, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.profile_picture)
        .bind(user.is_verified)
        .bind(&user.verification_token)
        .bind(user.verification_token_expires)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn email_or_phone_exists(
        &self,
        email: &str,
        phone_number: Option<&str>,
    ) -> Result<bool> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE email = ? OR (phone_number IS NOT NULL AND phone_number = ?)",
        )
        .bind(email)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.0 > 0)
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE verification_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE reset_password_token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn mark_verified(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE,
                verification_token = NULL,
                verification_token_expires = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn set_verification_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = ?,
                verification_token_expires = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token = ?,
                reset_password_expires = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
