mod collation_key;
mod entity_id;
mod image_media;
mod role;
mod storage_key;

pub use collation_key::CollationKey;
pub use entity_id::{AnimalId, ImageId, NoteId, UserId};
pub use image_media::{ImageFormat, ImageMedia};
pub use role::Role;
pub use storage_key::StorageKey;
