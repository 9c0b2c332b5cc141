//! Process-local repositories used when `DATABASE_URL` is `memory://`
//!
//! Records are kept in insertion order so listings match the Postgres
//! repositories, which order by creation time.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{
    AnimalRepository, ImageRepository, NoteRepository, RepositoryError, UserRepository,
};
use crate::domain::entities::{Animal, Image, Note, User, FIRST_TICKET};
use crate::domain::value_objects::{AnimalId, CollationKey, ImageId, NoteId, UserId};

/// Insert-ordered record table keyed by id
struct Table<K, V> {
    rows: RwLock<Vec<(K, V)>>,
}

impl<K: PartialEq + Copy, V: Clone> Table<K, V> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn all(&self) -> Vec<V> {
        self.rows.read().iter().map(|(_, v)| v.clone()).collect()
    }

    fn get(&self, id: &K) -> Option<V> {
        self.rows
            .read()
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.clone())
    }

    fn find(&self, pred: impl Fn(&V) -> bool) -> Option<V> {
        self.rows
            .read()
            .iter()
            .find(|(_, v)| pred(v))
            .map(|(_, v)| v.clone())
    }

    fn filter(&self, pred: impl Fn(&V) -> bool) -> Vec<V> {
        self.rows
            .read()
            .iter()
            .filter(|(_, v)| pred(v))
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn insert(&self, id: K, value: V) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write();
        if rows.iter().any(|(k, _)| *k == id) {
            return Err(RepositoryError::ConstraintViolation(
                "duplicate primary key".to_string(),
            ));
        }
        rows.push((id, value));
        Ok(())
    }

    fn replace(&self, id: K, value: V, missing: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => {
                slot.1 = value;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(missing.to_string())),
        }
    }

    fn remove(&self, id: &K) {
        self.rows.write().retain(|(k, _)| k != id);
    }
}

pub struct InMemoryAnimalRepository {
    table: Table<AnimalId, Animal>,
}

impl InMemoryAnimalRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryAnimalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnimalRepository for InMemoryAnimalRepository {
    async fn list(&self) -> Result<Vec<Animal>, RepositoryError> {
        Ok(self.table.all())
    }

    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, RepositoryError> {
        Ok(self.table.get(id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Animal>, RepositoryError> {
        Ok(self.table.find(|a| a.name() == name))
    }

    async fn find_by_name_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<Animal>, RepositoryError> {
        Ok(self.table.find(|a| a.name_key() == key))
    }

    async fn create(&self, animal: &Animal) -> Result<(), RepositoryError> {
        self.table.insert(*animal.id(), animal.clone())
    }

    async fn save(&self, animal: &Animal) -> Result<(), RepositoryError> {
        self.table
            .replace(*animal.id(), animal.clone(), "Animal not found")
    }

    async fn delete(&self, id: &AnimalId) -> Result<(), RepositoryError> {
        self.table.remove(id);
        Ok(())
    }
}

pub struct InMemoryImageRepository {
    table: Table<ImageId, Image>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryImageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn list(&self) -> Result<Vec<Image>, RepositoryError> {
        Ok(self.table.all())
    }

    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Image>, RepositoryError> {
        Ok(self.table.get(id))
    }

    async fn find_by_animal(&self, animal: &AnimalId) -> Result<Vec<Image>, RepositoryError> {
        Ok(self.table.filter(|i| i.animal() == animal))
    }

    async fn create(&self, image: &Image) -> Result<(), RepositoryError> {
        self.table.insert(*image.id(), image.clone())
    }

    async fn save(&self, image: &Image) -> Result<(), RepositoryError> {
        self.table
            .replace(*image.id(), image.clone(), "Image not found")
    }

    async fn delete(&self, id: &ImageId) -> Result<(), RepositoryError> {
        self.table.remove(id);
        Ok(())
    }
}

pub struct InMemoryUserRepository {
    table: Table<UserId, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.table.all())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.table.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.table.find(|u| u.username() == username))
    }

    async fn find_by_username_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.table.find(|u| u.username_key() == key))
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        self.table.insert(*user.id(), user.clone())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.table.replace(*user.id(), user.clone(), "User not found")
    }

    async fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        self.table.remove(id);
        Ok(())
    }
}

pub struct InMemoryNoteRepository {
    table: Table<NoteId, Note>,
    tickets: AtomicI64,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
            tickets: AtomicI64::new(FIRST_TICKET),
        }
    }
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        Ok(self.table.all())
    }

    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, RepositoryError> {
        Ok(self.table.get(id))
    }

    async fn find_by_title_key(
        &self,
        key: &CollationKey,
    ) -> Result<Option<Note>, RepositoryError> {
        Ok(self.table.find(|n| n.title_key() == key))
    }

    async fn next_ticket(&self) -> Result<i64, RepositoryError> {
        Ok(self.tickets.fetch_add(1, Ordering::SeqCst))
    }

    async fn exists_for_user(&self, user: &UserId) -> Result<bool, RepositoryError> {
        Ok(self.table.find(|n| n.user() == user).is_some())
    }

    async fn create(&self, note: &Note) -> Result<(), RepositoryError> {
        self.table.insert(*note.id(), note.clone())
    }

    async fn save(&self, note: &Note) -> Result<(), RepositoryError> {
        self.table.replace(*note.id(), note.clone(), "Note not found")
    }

    async fn delete(&self, id: &NoteId) -> Result<(), RepositoryError> {
        self.table.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tickets_start_at_first_ticket_and_increase() {
        let repo = InMemoryNoteRepository::new();

        let first = repo.next_ticket().await.unwrap();
        let second = repo.next_ticket().await.unwrap();

        assert_eq!(first, FIRST_TICKET);
        assert_eq!(second, FIRST_TICKET + 1);
    }

    #[tokio::test]
    async fn test_animal_lookup_by_exact_name_and_fold() {
        let repo = InMemoryAnimalRepository::new();
        repo.create(&Animal::new("Zoë", "A cat")).await.unwrap();

        assert!(repo.find_by_name("zoe").await.unwrap().is_none());
        assert!(repo
            .find_by_name_key(&CollationKey::new("ZOE"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryAnimalRepository::new();
        for name in ["b", "a", "c"] {
            repo.create(&Animal::new(name, "d")).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|a| a.name().to_string())
            .collect();

        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_save_missing_record_is_not_found() {
        let repo = InMemoryImageRepository::new();
        let image = Image::new(
            AnimalId::new(),
            crate::domain::value_objects::StorageKey::new("images/1.png").unwrap(),
            None,
        );

        let result = repo.save(&image).await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_images_filtered_by_animal() {
        let repo = InMemoryImageRepository::new();
        let rex = AnimalId::new();
        let key = |n: &str| crate::domain::value_objects::StorageKey::new(n).unwrap();
        repo.create(&Image::new(rex, key("images/1.png"), None))
            .await
            .unwrap();
        repo.create(&Image::new(AnimalId::new(), key("images/2.png"), None))
            .await
            .unwrap();

        let images = repo.find_by_animal(&rex).await.unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].path().as_str(), "images/1.png");
    }

    #[tokio::test]
    async fn test_exists_for_user() {
        let repo = InMemoryNoteRepository::new();
        let owner = UserId::new();
        repo.create(&Note::new(owner, AnimalId::new(), "t", "x", 500))
            .await
            .unwrap();

        assert!(repo.exists_for_user(&owner).await.unwrap());
        assert!(!repo.exists_for_user(&UserId::new()).await.unwrap());
    }
}
