use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::QueryBuilder;
use crate::application::ports::{ImageRepository, RepositoryError};
use crate::domain::entities::Image;
use crate::domain::value_objects::{AnimalId, ImageId, StorageKey};

pub struct PostgresImageRepository {
    pool: PgPool,
}

impl PostgresImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn list(&self) -> Result<Vec<Image>, RepositoryError> {
        let rows = sqlx::query_as::<_, ImageRow>(&QueryBuilder::select_ordered(
            QueryBuilder::IMAGE_SELECT,
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ImageRow::into_domain).collect()
    }

    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Image>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::IMAGE_SELECT, "id = $1");
        let row = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ImageRow::into_domain).transpose()
    }

    async fn find_by_animal(&self, animal: &AnimalId) -> Result<Vec<Image>, RepositoryError> {
        let sql = QueryBuilder::select_where(
            QueryBuilder::IMAGE_SELECT,
            "animal_id = $1 ORDER BY created_at ASC",
        );
        let rows = sqlx::query_as::<_, ImageRow>(&sql)
            .bind(animal.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ImageRow::into_domain).collect()
    }

    async fn create(&self, image: &Image) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO images (id, animal_id, path, caption, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(image.id().as_uuid())
        .bind(image.animal().as_uuid())
        .bind(image.path().as_str())
        .bind(image.caption())
        .bind(image.created_at())
        .bind(image.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, image: &Image) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE images
            SET caption = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(image.id().as_uuid())
        .bind(image.caption())
        .bind(image.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Image not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ImageId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    animal_id: Uuid,
    path: String,
    caption: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ImageRow {
    fn into_domain(self) -> Result<Image, RepositoryError> {
        let path = StorageKey::new(self.path)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(Image::reconstruct(
            ImageId::from_uuid(self.id),
            AnimalId::from_uuid(self.animal_id),
            path,
            self.caption,
            self.created_at,
            self.updated_at,
        ))
    }
}
