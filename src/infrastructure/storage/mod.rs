mod local_filesystem_store;
mod object_storage_store;
mod path_builder;

pub use local_filesystem_store::LocalFilesystemStore;
pub use object_storage_store::{ObjectStorageSettings, ObjectStorageStore};
pub use path_builder::{PathBuilder, IMAGES_DIR};
