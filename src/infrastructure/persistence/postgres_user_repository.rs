use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::QueryBuilder;
use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::entities::User;
use crate::domain::value_objects::{AnimalId, CollationKey, Role, UserId};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<User>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::USER_SELECT, filter);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_domain).transpose()
    }
}

fn role_names(user: &User) -> Vec<String> {
    user.roles().iter().map(|r| r.as_str().to_string()).collect()
}

fn favorite_ids(user: &User) -> Vec<Uuid> {
    user.favorites().iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&QueryBuilder::select_ordered(
            QueryBuilder::USER_SELECT,
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_domain).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::USER_SELECT, "id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_domain).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.find_one("username = $1 LIMIT 1", username).await
    }

    async fn find_by_username_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<User>, RepositoryError> {
        self.find_one("username_key = $1 LIMIT 1", key.as_str()).await
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, username_key, password_hash, roles, active, favorites,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.username_key().as_str())
        .bind(user.password_hash())
        .bind(role_names(user))
        .bind(user.is_active())
        .bind(favorite_ids(user))
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, username_key = $3, password_hash = $4, roles = $5,
                active = $6, favorites = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.username_key().as_str())
        .bind(user.password_hash())
        .bind(role_names(user))
        .bind(user.is_active())
        .bind(favorite_ids(user))
        .bind(user.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    roles: Vec<String>,
    active: bool,
    favorites: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let roles = Role::parse_all(&self.roles)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(User::reconstruct(
            UserId::from_uuid(self.id),
            self.username,
            self.password_hash,
            roles,
            self.active,
            self.favorites.into_iter().map(AnimalId::from_uuid).collect(),
            self.created_at,
            self.updated_at,
        ))
    }
}
