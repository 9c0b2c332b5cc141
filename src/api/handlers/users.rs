use axum::{extract::State, http::StatusCode, response::Json, Extension};

use crate::api::errors::ApiError;
use crate::api::router::AppState;
use crate::application::dto::{
    CreateUserRequest, DeleteByIdRequest, MessageResponse, ToggleFavoriteRequest,
    UpdateUserRequest, UserDto,
};
use crate::domain::authorization::{permissions, UserContext};
use crate::domain::validation::Validation;

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 400, description = "No users found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    user.require(permissions::USERS_READ)?;

    let users = state.list_users.execute().await?;
    Validation::validate_not_empty_collection(&users, "users", "No users found")?;
    Ok(Json(users))
}

/// POST /users
/// Public sign-up
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Duplicate username")
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let response = state.create_user.execute(&request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /users
#[utoipa::path(
    patch,
    path = "/users",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Duplicate username")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::USERS_WRITE)?;
    Ok(Json(state.update_user.execute(&request).await?))
}

/// DELETE /users
#[utoipa::path(
    delete,
    path = "/users",
    tag = "users",
    request_body = DeleteByIdRequest,
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "User has assigned notes"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<DeleteByIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::USERS_DELETE)?;
    Ok(Json(state.delete_user.execute(&request).await?))
}

/// PATCH /users/favorites
/// Toggle an animal in a user's favorites
#[utoipa::path(
    patch,
    path = "/users/favorites",
    tag = "users",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Favorites updated", body = MessageResponse),
        (status = 403, description = "Not allowed to edit this user's favorites"),
        (status = 404, description = "User or animal not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<ToggleFavoriteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require(permissions::FAVORITES_WRITE)?;
    Ok(Json(state.toggle_favorite.execute(&user, &request).await?))
}
