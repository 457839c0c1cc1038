use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{required_text, required_text_opt};
use crate::{
    api::dto::{CreateZone, UpdateZone},
    db::models::Zone,
    errors::AppError,
};

pub async fn create(pool: &PgPool, payload: CreateZone) -> Result<Zone, AppError> {
    let name = required_text("name", &payload.name)?;

    let zone = sqlx::query_as::<_, Zone>(
        "INSERT INTO zones (id, name, description, is_active) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(payload.description)
    .bind(payload.is_active)
    .fetch_one(pool)
    .await?;
    Ok(zone)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Zone, AppError> {
    sqlx::query_as::<_, Zone>("SELECT * FROM zones WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("zone"))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Zone>, AppError> {
    let zones = sqlx::query_as::<_, Zone>("SELECT * FROM zones")
        .fetch_all(pool)
        .await?;
    Ok(zones)
}

pub async fn update(pool: &PgPool, id: Uuid, changes: UpdateZone) -> Result<Zone, AppError> {
    let name = required_text_opt("name", changes.name.as_deref())?;

    sqlx::query_as::<_, Zone>(
        "UPDATE zones SET \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            is_active = COALESCE($4, is_active) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(changes.description)
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("zone"))
}

/// Unconditional delete; only the deletion guard calls this.
pub async fn delete(exec: impl PgExecutor<'_>, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM zones WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("zone"));
    }
    Ok(())
}
