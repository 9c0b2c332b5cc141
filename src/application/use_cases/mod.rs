mod animal_lifecycle;
mod auth;
mod images;
mod notes;
mod users;

pub use animal_lifecycle::{AnimalLifecycleCoordinator, AnimalSubmission, LifecycleOutcome};
pub use auth::{LoginUseCase, RefreshUseCase, SessionTokens};
pub use images::{CreateImageUseCase, DeleteImageUseCase, ListImagesUseCase, UpdateImageUseCase};
pub use notes::{CreateNoteUseCase, DeleteNoteUseCase, ListNotesUseCase, UpdateNoteUseCase};
pub use users::{
    CreateUserUseCase, DeleteUserUseCase, ListUsersUseCase, ToggleFavoriteUseCase,
    UpdateUserUseCase,
};
