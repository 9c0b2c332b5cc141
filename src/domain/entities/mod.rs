mod animal;
mod image;
mod note;
mod user;

pub use animal::Animal;
pub use image::Image;
pub use note::{Note, FIRST_TICKET};
pub use user::{FavoriteToggle, User};
