use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::api::handlers::{
    create_animal_handler, create_image_handler, create_note_handler, create_user_handler,
    delete_animal_handler, delete_image_handler, delete_note_handler, delete_user_handler,
    health_handler, list_animals_handler, list_images_handler, list_notes_handler,
    list_users_handler, login_handler, logout_handler, refresh_handler, toggle_favorite_handler,
    update_animal_handler, update_image_handler, update_note_handler, update_user_handler,
};
use crate::api::middleware::{auth, cors, rate_limiting, LoginRateLimiter};
use crate::api::openapi::swagger_ui;
use crate::application::ports::TokenService;
use crate::application::staging::UploadStaging;
use crate::application::use_cases::{
    AnimalLifecycleCoordinator, CreateImageUseCase, CreateNoteUseCase, CreateUserUseCase,
    DeleteImageUseCase, DeleteNoteUseCase, DeleteUserUseCase, ListImagesUseCase,
    ListNotesUseCase, ListUsersUseCase, LoginUseCase, RefreshUseCase, ToggleFavoriteUseCase,
    UpdateImageUseCase, UpdateNoteUseCase, UpdateUserUseCase,
};
use crate::config::Config;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub animals: Arc<AnimalLifecycleCoordinator>,
    pub list_images: Arc<ListImagesUseCase>,
    pub create_image: Arc<CreateImageUseCase>,
    pub update_image: Arc<UpdateImageUseCase>,
    pub delete_image: Arc<DeleteImageUseCase>,
    pub list_users: Arc<ListUsersUseCase>,
    pub create_user: Arc<CreateUserUseCase>,
    pub update_user: Arc<UpdateUserUseCase>,
    pub delete_user: Arc<DeleteUserUseCase>,
    pub toggle_favorite: Arc<ToggleFavoriteUseCase>,
    pub list_notes: Arc<ListNotesUseCase>,
    pub create_note: Arc<CreateNoteUseCase>,
    pub update_note: Arc<UpdateNoteUseCase>,
    pub delete_note: Arc<DeleteNoteUseCase>,
    pub login: Arc<LoginUseCase>,
    pub refresh: Arc<RefreshUseCase>,
    pub tokens: Arc<dyn TokenService>,
    pub staging: Arc<UploadStaging>,
    pub login_limiter: Arc<LoginRateLimiter>,
    pub pool: Option<Arc<PgPool>>,
    pub config: Arc<Config>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let body_limit = (state.config.max_upload_bytes + MULTIPART_OVERHEAD) as usize;

    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/animals", get(list_animals_handler))
        .route("/images", get(list_images_handler))
        .route("/users", post(create_user_handler))
        .route(
            "/auth",
            post(login_handler).route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                rate_limiting::login_rate_limit,
            )),
        )
        .route("/auth/refresh", get(refresh_handler))
        .route("/auth/logout", post(logout_handler));

    let protected = Router::new()
        .route(
            "/animals",
            post(create_animal_handler)
                .patch(update_animal_handler)
                .delete(delete_animal_handler),
        )
        .route(
            "/images",
            post(create_image_handler)
                .patch(update_image_handler)
                .delete(delete_image_handler),
        )
        .route(
            "/users",
            get(list_users_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/users/favorites", patch(toggle_favorite_handler))
        .route(
            "/notes",
            get(list_notes_handler)
                .post(create_note_handler)
                .patch(update_note_handler)
                .delete(delete_note_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Image keys are `images/<name>` relative to the public root
    let static_images = ServeDir::new(state.config.public_root.clone());

    Router::new()
        .merge(public)
        .merge(protected)
        .route_service("/images/{file}", static_images)
        .merge(swagger_ui())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors::create_cors_layer(&state.config))
        .with_state(state)
}
