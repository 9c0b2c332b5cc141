/// Common SQL query fragments shared by the repositories
pub struct QueryBuilder;

impl QueryBuilder {
    pub const ANIMAL_SELECT: &'static str = r#"
        SELECT id, name, description, created_at, updated_at
        FROM animals
    "#;

    pub const IMAGE_SELECT: &'static str = r#"
        SELECT id, animal_id, path, caption, created_at, updated_at
        FROM images
    "#;

    pub const USER_SELECT: &'static str = r#"
        SELECT id, username, password_hash, roles, active, favorites, created_at, updated_at
        FROM users
    "#;

    pub const NOTE_SELECT: &'static str = r#"
        SELECT id, user_id, animal_id, title, text, ticket, created_at, updated_at
        FROM notes
    "#;

    /// Select clause followed by a filter
    pub fn select_where(select: &str, filter: &str) -> String {
        format!("{} WHERE {}", select, filter)
    }

    /// Select clause ordered oldest first
    pub fn select_ordered(select: &str) -> String {
        format!("{} ORDER BY created_at ASC", select)
    }
}
