use std::collections::HashSet;

use crate::domain::value_objects::{Role, UserId};

/// Permission constants for the animal CMS
pub mod permissions {
    // Animal operations
    pub const ANIMALS_READ: &str = "animals:read";
    pub const ANIMALS_WRITE: &str = "animals:write";
    pub const ANIMALS_DELETE: &str = "animals:delete";

    // Image operations
    pub const IMAGES_WRITE: &str = "images:write";

    // Notes
    pub const NOTES_READ: &str = "notes:read";
    pub const NOTES_WRITE: &str = "notes:write";

    // User management
    pub const USERS_READ: &str = "users:read";
    pub const USERS_WRITE: &str = "users:write";
    pub const USERS_DELETE: &str = "users:delete";

    // Favorites: own account only, or any account
    pub const FAVORITES_WRITE: &str = "favorites:write";
    pub const FAVORITES_ANY: &str = "favorites:any";

    pub const ALL: &[&str] = &[
        ANIMALS_READ,
        ANIMALS_WRITE,
        ANIMALS_DELETE,
        IMAGES_WRITE,
        NOTES_READ,
        NOTES_WRITE,
        USERS_READ,
        USERS_WRITE,
        USERS_DELETE,
        FAVORITES_WRITE,
        FAVORITES_ANY,
    ];
}

/// Role definitions with their associated permissions
pub mod roles {
    use super::permissions::*;
    use crate::domain::value_objects::Role;

    pub const CUSTOMER: &[&str] = &[ANIMALS_READ, NOTES_READ, FAVORITES_WRITE];
    pub const EMPLOYEE: &[&str] = &[
        ANIMALS_READ,
        NOTES_READ,
        FAVORITES_WRITE,
        ANIMALS_WRITE,
        IMAGES_WRITE,
        NOTES_WRITE,
    ];
    pub const MANAGER: &[&str] = &[
        ANIMALS_READ,
        NOTES_READ,
        FAVORITES_WRITE,
        ANIMALS_WRITE,
        IMAGES_WRITE,
        NOTES_WRITE,
        USERS_READ,
        USERS_WRITE,
    ];
    pub const ADMIN: &[&str] = ALL;

    /// Get permissions for a role
    pub fn get_permissions_for_role(role: Role) -> &'static [&'static str] {
        match role {
            Role::Customer => CUSTOMER,
            Role::Employee => EMPLOYEE,
            Role::Manager => MANAGER,
            Role::Admin => ADMIN,
        }
    }
}

/// Authenticated caller, placed in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
    pub permissions: HashSet<&'static str>,
}

impl UserContext {
    /// Build a context whose permissions are the union of its roles' permissions
    pub fn new(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        let permissions = roles
            .iter()
            .flat_map(|role| roles::get_permissions_for_role(*role).iter().copied())
            .collect();
        Self {
            user_id,
            username: username.into(),
            roles,
            permissions,
        }
    }

    /// Check if user has a specific permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Fail with `PermissionDenied` unless the permission is held
    pub fn require(&self, permission: &str) -> Result<(), AuthorizationError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AuthorizationError::PermissionDenied(permission.to_string()))
        }
    }

    /// Whether this caller may change favorites of the given account
    pub fn can_edit_favorites_of(&self, user_id: &UserId) -> bool {
        self.has_permission(permissions::FAVORITES_ANY)
            || (self.has_permission(permissions::FAVORITES_WRITE) && self.user_id == *user_id)
    }
}

/// Authorization error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Unauthorized")]
    AuthenticationRequired,

    #[error("Forbidden")]
    PermissionDenied(String),
}
