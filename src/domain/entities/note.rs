use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AnimalId, CollationKey, NoteId, UserId};

/// First ticket number handed out by the note sequence
pub const FIRST_TICKET: i64 = 500;

/// Note written by a user about an animal, identified to humans by its ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    user: UserId,
    animal: AnimalId,
    title: String,
    title_key: CollationKey,
    text: String,
    ticket: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with a ticket already reserved from the store sequence
    pub fn new(
        user: UserId,
        animal: AnimalId,
        title: impl Into<String>,
        text: impl Into<String>,
        ticket: i64,
    ) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: NoteId::new(),
            user,
            animal,
            title_key: CollationKey::new(&title),
            title,
            text: text.into(),
            ticket,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: NoteId,
        user: UserId,
        animal: AnimalId,
        title: String,
        text: String,
        ticket: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            animal,
            title_key: CollationKey::new(&title),
            title,
            text,
            ticket,
            created_at,
            updated_at,
        }
    }

    /// Replace the editable fields. The ticket is never touched.
    pub fn update(
        &mut self,
        user: UserId,
        animal: AnimalId,
        title: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.user = user;
        self.animal = animal;
        self.title = title.into();
        self.title_key = CollationKey::new(&self.title);
        self.text = text.into();
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn animal(&self) -> &AnimalId {
        &self.animal
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn title_key(&self) -> &CollationKey {
        &self.title_key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ticket(&self) -> i64 {
        self.ticket
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
