use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::QueryBuilder;
use crate::application::ports::{AnimalRepository, RepositoryError};
use crate::domain::entities::Animal;
use crate::domain::value_objects::{AnimalId, CollationKey};

pub struct PostgresAnimalRepository {
    pool: PgPool,
}

impl PostgresAnimalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<Animal>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::ANIMAL_SELECT, filter);
        let row = sqlx::query_as::<_, AnimalRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AnimalRow::into_domain))
    }
}

#[async_trait]
impl AnimalRepository for PostgresAnimalRepository {
    async fn list(&self) -> Result<Vec<Animal>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnimalRow>(&QueryBuilder::select_ordered(
            QueryBuilder::ANIMAL_SELECT,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AnimalRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::ANIMAL_SELECT, "id = $1");
        let row = sqlx::query_as::<_, AnimalRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AnimalRow::into_domain))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Animal>, RepositoryError> {
        self.find_one("name = $1 LIMIT 1", name).await
    }

    async fn find_by_name_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<Animal>, RepositoryError> {
        self.find_one("name_key = $1 LIMIT 1", key.as_str()).await
    }

    async fn create(&self, animal: &Animal) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO animals (id, name, name_key, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(animal.id().as_uuid())
        .bind(animal.name())
        .bind(animal.name_key().as_str())
        .bind(animal.description())
        .bind(animal.created_at())
        .bind(animal.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, animal: &Animal) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE animals
            SET name = $2, name_key = $3, description = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(animal.id().as_uuid())
        .bind(animal.name())
        .bind(animal.name_key().as_str())
        .bind(animal.description())
        .bind(animal.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Animal not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &AnimalId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM animals WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct AnimalRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnimalRow {
    fn into_domain(self) -> Animal {
        Animal::reconstruct(
            AnimalId::from_uuid(self.id),
            self.name,
            self.description,
            self.created_at,
            self.updated_at,
        )
    }
}
