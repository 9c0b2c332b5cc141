use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AnimalId, CollationKey};

/// Animal aggregate root. Images reference it through their `animal` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    id: AnimalId,
    name: String,
    name_key: CollationKey,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Animal {
    /// Create a new animal; callers validate the fields beforehand
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: AnimalId::new(),
            name_key: CollationKey::new(&name),
            name,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct from storage
    pub fn reconstruct(
        id: AnimalId,
        name: String,
        description: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name_key: CollationKey::new(&name),
            name,
            description,
            created_at,
            updated_at,
        }
    }

    /// Overwrite name and description
    pub fn update_details(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.name = name.into();
        self.name_key = CollationKey::new(&self.name);
        self.description = description.into();
        self.updated_at = Utc::now();
    }

    pub fn id(&self) -> &AnimalId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_key(&self) -> &CollationKey {
        &self.name_key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_animal_sets_timestamps_and_key() {
        let animal = Animal::new("León", "A lion");

        assert_eq!(animal.name(), "León");
        assert_eq!(animal.name_key().as_str(), "leon");
        assert_eq!(animal.created_at(), animal.updated_at());
    }

    #[test]
    fn test_update_details_refreshes_key() {
        let mut animal = Animal::new("Rex", "A dog");
        let created_at = animal.created_at();

        animal.update_details("Rexanne", "Still a dog");

        assert_eq!(animal.name(), "Rexanne");
        assert_eq!(animal.name_key().as_str(), "rexanne");
        assert_eq!(animal.description(), "Still a dog");
        assert_eq!(animal.created_at(), created_at);
        assert!(animal.updated_at() >= created_at);
    }
}
