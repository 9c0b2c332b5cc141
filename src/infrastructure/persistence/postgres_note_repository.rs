use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::QueryBuilder;
use crate::application::ports::{NoteRepository, RepositoryError};
use crate::domain::entities::Note;
use crate::domain::value_objects::{AnimalId, CollationKey, NoteId, UserId};

pub struct PostgresNoteRepository {
    pool: PgPool,
}

impl PostgresNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PostgresNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let rows = sqlx::query_as::<_, NoteRow>(&QueryBuilder::select_ordered(
            QueryBuilder::NOTE_SELECT,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NoteRow::into_domain).collect())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::NOTE_SELECT, "id = $1");
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(NoteRow::into_domain))
    }

    async fn find_by_title_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<Note>, RepositoryError> {
        let sql = QueryBuilder::select_where(QueryBuilder::NOTE_SELECT, "title_key = $1 LIMIT 1");
        let row = sqlx::query_as::<_, NoteRow>(&sql)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(NoteRow::into_domain))
    }

    async fn next_ticket(&self) -> Result<i64, RepositoryError> {
        let ticket: i64 = sqlx::query_scalar("SELECT nextval('note_ticket_seq')")
            .fetch_one(&self.pool)
            .await?;

        Ok(ticket)
    }

    async fn exists_for_user(&self, user: &UserId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM notes WHERE user_id = $1)")
                .bind(user.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, note: &Note) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO notes (
                id, user_id, animal_id, title, title_key, text, ticket, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(note.id().as_uuid())
        .bind(note.user().as_uuid())
        .bind(note.animal().as_uuid())
        .bind(note.title())
        .bind(note.title_key().as_str())
        .bind(note.text())
        .bind(note.ticket())
        .bind(note.created_at())
        .bind(note.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, note: &Note) -> Result<(), RepositoryError> {
        // ticket is deliberately absent from the SET list
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET user_id = $2, animal_id = $3, title = $4, title_key = $5, text = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(note.id().as_uuid())
        .bind(note.user().as_uuid())
        .bind(note.animal().as_uuid())
        .bind(note.title())
        .bind(note.title_key().as_str())
        .bind(note.text())
        .bind(note.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Note not found".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct NoteRow {
    id: Uuid,
    user_id: Uuid,
    animal_id: Uuid,
    title: String,
    text: String,
    ticket: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NoteRow {
    fn into_domain(self) -> Note {
        Note::reconstruct(
            NoteId::from_uuid(self.id),
            UserId::from_uuid(self.user_id),
            AnimalId::from_uuid(self.animal_id),
            self.title,
            self.text,
            self.ticket,
            self.created_at,
            self.updated_at,
        )
    }
}
