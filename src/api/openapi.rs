use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::health::HealthResponse;
use crate::application::dto::{
    AccessTokenResponse, AnimalDto, CreateNoteRequest, CreateUserRequest, DeleteAnimalRequest,
    DeleteByIdRequest, ImageDto, LoginRequest, MessageResponse, NoteDto, ToggleFavoriteRequest,
    UpdateImageRequest, UpdateNoteRequest, UpdateUserRequest, UserDto,
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI specification for the animal CMS API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Animal CMS API",
        version = "1.0.0",
        description = "Animals, their images, staff notes and user accounts"
    ),
    servers(
        (url = "http://localhost:3500", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::animals::list_animals_handler,
        crate::api::handlers::animals::create_animal_handler,
        crate::api::handlers::animals::update_animal_handler,
        crate::api::handlers::animals::delete_animal_handler,
        crate::api::handlers::images::list_images_handler,
        crate::api::handlers::images::create_image_handler,
        crate::api::handlers::images::update_image_handler,
        crate::api::handlers::images::delete_image_handler,
        crate::api::handlers::users::list_users_handler,
        crate::api::handlers::users::create_user_handler,
        crate::api::handlers::users::update_user_handler,
        crate::api::handlers::users::delete_user_handler,
        crate::api::handlers::users::toggle_favorite_handler,
        crate::api::handlers::notes::list_notes_handler,
        crate::api::handlers::notes::create_note_handler,
        crate::api::handlers::notes::update_note_handler,
        crate::api::handlers::notes::delete_note_handler,
        crate::api::handlers::auth::login_handler,
        crate::api::handlers::auth::refresh_handler,
        crate::api::handlers::auth::logout_handler,
    ),
    components(
        schemas(
            HealthResponse,
            AnimalDto,
            ImageDto,
            UserDto,
            NoteDto,
            MessageResponse,
            AccessTokenResponse,
            DeleteAnimalRequest,
            DeleteByIdRequest,
            UpdateImageRequest,
            CreateUserRequest,
            UpdateUserRequest,
            ToggleFavoriteRequest,
            CreateNoteRequest,
            UpdateNoteRequest,
            LoginRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "animals", description = "Animals and their image lifecycle"),
        (name = "images", description = "Animal images"),
        (name = "users", description = "User accounts and favorites"),
        (name = "notes", description = "Staff notes"),
        (name = "auth", description = "Login and session tokens")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI route
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
