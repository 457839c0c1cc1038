use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{required_text, required_text_opt};
use crate::{
    api::dto::{CreateUser, UpdateUser},
    auth,
    db::models::User,
    errors::{unique_conflict, AppError},
};

pub async fn create(pool: &PgPool, payload: CreateUser) -> Result<User, AppError> {
    let name = required_text("name", &payload.name)?;
    let email = required_text("email", &payload.email)?;
    let password_hash = payload.password.as_deref().map(auth::hash_password);

    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(payload.role)
    .fetch_one(pool)
    .await
    .map_err(unique_conflict("email"))
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("user"))
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Applies only the supplied fields; absent fields are left untouched.
pub async fn update(pool: &PgPool, id: Uuid, changes: UpdateUser) -> Result<User, AppError> {
    let name = required_text_opt("name", changes.name.as_deref())?;
    let email = required_text_opt("email", changes.email.as_deref())?;
    let password_hash = changes.password.as_deref().map(auth::hash_password);

    sqlx::query_as::<_, User>(
        "UPDATE users SET \
            name = COALESCE($2, name), \
            email = COALESCE($3, email), \
            password_hash = COALESCE($4, password_hash), \
            role = COALESCE($5, role) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(changes.role)
    .fetch_optional(pool)
    .await
    .map_err(unique_conflict("email"))?
    .ok_or(AppError::NotFound("user"))
}

/// Unconditional delete. Reached only through the deletion guard, which runs
/// the dependent-count check in the same transaction.
pub async fn delete(exec: impl PgExecutor<'_>, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}
