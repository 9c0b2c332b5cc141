use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AnimalId, CollationKey, Role, UserId};

/// Result of toggling an animal in a user's favorites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// User account. The password is only ever held as an opaque hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: String,
    username_key: CollationKey,
    password_hash: String,
    roles: Vec<Role>,
    active: bool,
    favorites: Vec<AnimalId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active user. An empty role list falls back to the default role.
    pub fn new(username: impl Into<String>, password_hash: String, roles: Vec<Role>) -> Self {
        let username = username.into();
        let roles = if roles.is_empty() {
            vec![Role::default()]
        } else {
            roles
        };
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username_key: CollationKey::new(&username),
            username,
            password_hash,
            roles,
            active: true,
            favorites: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: UserId,
        username: String,
        password_hash: String,
        roles: Vec<Role>,
        active: bool,
        favorites: Vec<AnimalId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username_key: CollationKey::new(&username),
            username,
            password_hash,
            roles,
            active,
            favorites,
            created_at,
            updated_at,
        }
    }

    /// Replace username, roles and active flag
    pub fn update_profile(
        &mut self,
        username: impl Into<String>,
        roles: Vec<Role>,
        active: bool,
    ) -> Result<(), DomainError> {
        if roles.is_empty() {
            return Err(DomainError::EmptyRoles);
        }
        self.username = username.into();
        self.username_key = CollationKey::new(&self.username);
        self.roles = roles;
        self.active = active;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Add the animal if absent, remove it if present
    pub fn toggle_favorite(&mut self, animal: AnimalId) -> FavoriteToggle {
        self.updated_at = Utc::now();
        match self.favorites.iter().position(|id| *id == animal) {
            Some(index) => {
                self.favorites.remove(index);
                FavoriteToggle::Removed
            }
            None => {
                self.favorites.push(animal);
                FavoriteToggle::Added
            }
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn username_key(&self) -> &CollationKey {
        &self.username_key
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn favorites(&self) -> &[AnimalId] {
        &self.favorites
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
    fn test_new_user_defaults() {
        let user = User::new("dave", "hash".to_string(), vec![]);

        assert_eq!(user.roles(), &[Role::Customer]);
        assert!(user.is_active());
        assert!(user.favorites().is_empty());
    }

    #[test]
    fn test_toggle_favorite_twice_restores_set() {
        let mut user = User::new("dave", "hash".to_string(), vec![Role::Employee]);
        let animal = AnimalId::new();

        assert_eq!(user.toggle_favorite(animal), FavoriteToggle::Added);
        assert_eq!(user.favorites(), &[animal]);

        assert_eq!(user.toggle_favorite(animal), FavoriteToggle::Removed);
        assert!(user.favorites().is_empty());
    }

    #[test]
    fn test_update_profile_rejects_empty_roles() {
        let mut user = User::new("dave", "hash".to_string(), vec![]);
        assert_eq!(
            user.update_profile("dave", vec![], true),
            Err(DomainError::EmptyRoles)
        );
    }

    #[test]
    fn test_update_profile() {
        let mut user = User::new("dave", "hash".to_string(), vec![]);

        user.update_profile("Dávid", vec![Role::Manager], false).unwrap();

        assert_eq!(user.username(), "Dávid");
        assert_eq!(user.username_key().as_str(), "david");
        assert_eq!(user.roles(), &[Role::Manager]);
        assert!(!user.is_active());
    }
}
