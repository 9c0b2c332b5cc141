mod in_memory;
mod postgres_animal_repository;
mod postgres_image_repository;
mod postgres_note_repository;
mod postgres_user_repository;
mod query_builder;

pub use in_memory::{
    InMemoryAnimalRepository, InMemoryImageRepository, InMemoryNoteRepository,
    InMemoryUserRepository,
};
pub use postgres_animal_repository::PostgresAnimalRepository;
pub use postgres_image_repository::PostgresImageRepository;
pub use postgres_note_repository::PostgresNoteRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use query_builder::QueryBuilder;
