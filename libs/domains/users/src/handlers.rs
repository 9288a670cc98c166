use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    AppError, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    ChangePassword, CreateUser, ExistsResponse, NameSearchParams, Role, UpdateUser, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        get_user_by_email,
        get_user_by_username,
        update_user,
        deactivate_user,
        activate_user,
        change_password,
        list_active_users,
        list_users_by_role,
        search_users,
        check_email,
        check_username,
    ),
    components(
        schemas(
            UserResponse,
            CreateUser,
            UpdateUser,
            ChangePassword,
            Role,
            ExistsResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the user router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/active", get(list_active_users))
        .route("/search", get(search_users))
        .route("/email/{email}", get(get_user_by_email))
        .route("/username/{username}", get(get_user_by_username))
        .route("/role/{role}", get(list_users_by_role))
        .route("/check-email/{email}", get(check_email))
        .route("/check-username/{username}", get(check_username))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(deactivate_user),
        )
        .route("/{id}/activate", patch(activate_user))
        .route("/{id}/password", patch(change_password))
        .with_state(shared_service)
}

fn to_responses(users: Vec<crate::models::User>) -> Vec<UserResponse> {
    users.into_iter().map(|u| u.into()).collect()
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users().await?;
    Ok(Json(to_responses(users)))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i64>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?.ok_or(UserError::NotFound(id))?;
    Ok(Json(user.into()))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = TAG,
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = service
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with email '{}' not found", email)))?;
    Ok(Json(user.into()))
}

/// Get a user by username
#[utoipa::path(
    get,
    path = "/username/{username}",
    tag = TAG,
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_username<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = service.get_user_by_username(&username).await?.ok_or_else(|| {
        AppError::NotFound(format!("User with username '{}' not found", username))
    })?;
    Ok(Json(user.into()))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user.into()))
}

/// Deactivate a user (users are never hard-deleted)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deactivated", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i64>,
) -> UserResult<Json<UserResponse>> {
    let user = service.deactivate_user(id).await?;
    Ok(Json(user.into()))
}

/// Reactivate a user
#[utoipa::path(
    patch,
    path = "/{id}/activate",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User activated", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i64>,
) -> UserResult<Json<UserResponse>> {
    let user = service.activate_user(id).await?;
    Ok(Json(user.into()))
}

/// Change a user's password
#[utoipa::path(
    patch,
    path = "/{id}/password",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password changed", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn change_password<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<ChangePassword>,
) -> UserResult<Json<UserResponse>> {
    let user = service.change_password(id, &input.password).await?;
    Ok(Json(user.into()))
}

/// List active users
#[utoipa::path(
    get,
    path = "/active",
    tag = TAG,
    responses(
        (status = 200, description = "Active users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_active_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_active_users().await?;
    Ok(Json(to_responses(users)))
}

/// List users by role
#[utoipa::path(
    get,
    path = "/role/{role}",
    tag = TAG,
    params(
        ("role" = String, Path, description = "Role name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Users with the role", body = Vec<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users_by_role<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(role): Path<String>,
) -> UserResult<Json<Vec<UserResponse>>> {
    // Role tokens are validated here, before the service is involved
    let role: Role = role
        .parse()
        .map_err(|_| UserError::InvalidInput(format!("Invalid role: {}", role)))?;

    let users = service.list_users_by_role(role).await?;
    Ok(Json(to_responses(users)))
}

/// Search users by first or last name
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(NameSearchParams),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Query(params): Query<NameSearchParams>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.search_users_by_name(params.name.as_deref()).await?;
    Ok(Json(to_responses(users)))
}

/// Check whether an email is already registered
#[utoipa::path(
    get,
    path = "/check-email/{email}",
    tag = TAG,
    params(
        ("email" = String, Path, description = "Email to check")
    ),
    responses(
        (status = 200, description = "Existence result", body = ExistsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<ExistsResponse>> {
    let exists = service.email_exists(&email).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Check whether a username is already taken
#[utoipa::path(
    get,
    path = "/check-username/{username}",
    tag = TAG,
    params(
        ("username" = String, Path, description = "Username to check")
    ),
    responses(
        (status = 200, description = "Existence result", body = ExistsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_username<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(username): Path<String>,
) -> UserResult<Json<ExistsResponse>> {
    let exists = service.username_exists(&username).await?;
    Ok(Json(ExistsResponse { exists }))
}
