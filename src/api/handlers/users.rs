use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    api::{
        dto::{CreateUser, Deleted, UpdateUser},
        extract,
    },
    db::models::User,
    errors::AppError,
    integrity::guard,
    store::{self, users},
};

/// List all registered users.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn list_users(State(pool): State<PgPool>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(users::list(&pool).await?))
}

/// Fetch a single user by id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(users::get(&pool, id).await?))
}

/// Create a user. Email must be unique; the password is stored hashed.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(pool): State<PgPool>,
    extract::Json(payload): extract::Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = users::create(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Partially update a user; absent fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Malformed id or invalid field"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    extract::Json(changes): extract::Json<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(users::update(&pool, id, changes).await?))
}

/// Delete a user. Refused while any device names the user as owner.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = Deleted),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Devices are still assigned to the user"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = store::parse_id(&id)?;
    guard::delete_user(&pool, id).await?;
    Ok(Json(Deleted { id }))
}
