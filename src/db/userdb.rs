use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::User;
use crate::service::error::ServiceError;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, ServiceError>;

    /// Creates the user together with their wallet; a user without a wallet
    /// cannot exist.
    async fn save_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError>;

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, ServiceError>;

    async fn count_users(&self) -> Result<i64, ServiceError>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, ServiceError> {
        let user = if let Some(user_id) = user_id {
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password, role, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
        } else if let Some(username) = username {
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password, role, created_at, updated_at
                FROM users
                WHERE username = $1
                "#,
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        } else if let Some(email) = email {
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, username, email, password, role, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
        } else {
            None
        };

        Ok(user)
    }

    async fn save_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password, role, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO wallets (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, ServiceError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count_users(&self) -> Result<i64, ServiceError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
