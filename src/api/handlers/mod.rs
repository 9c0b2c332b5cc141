pub mod animals;
pub mod auth;
pub mod health;
pub mod images;
pub mod notes;
pub mod users;

pub use animals::{
    create_animal_handler, delete_animal_handler, list_animals_handler, update_animal_handler,
};
pub use auth::{login_handler, logout_handler, refresh_handler};
pub use health::health_handler;
pub use images::{
    create_image_handler, delete_image_handler, list_images_handler, update_image_handler,
};
pub use notes::{create_note_handler, delete_note_handler, list_notes_handler, update_note_handler};
pub use users::{
    create_user_handler, delete_user_handler, list_users_handler, toggle_favorite_handler,
    update_user_handler,
};
