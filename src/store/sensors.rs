use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    api::dto::{CreateSensor, UpdateSensor},
    db::models::Sensor,
    errors::AppError,
};

pub async fn create(pool: &PgPool, payload: CreateSensor) -> Result<Sensor, AppError> {
    let sensor = sqlx::query_as::<_, Sensor>(
        "INSERT INTO sensors (id, kind, unit, model, location, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.kind)
    .bind(payload.unit)
    .bind(payload.model)
    .bind(payload.location)
    .bind(payload.is_active)
    .fetch_one(pool)
    .await?;
    Ok(sensor)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Sensor, AppError> {
    sqlx::query_as::<_, Sensor>("SELECT * FROM sensors WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("sensor"))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Sensor>, AppError> {
    let sensors = sqlx::query_as::<_, Sensor>("SELECT * FROM sensors")
        .fetch_all(pool)
        .await?;
    Ok(sensors)
}

pub async fn update(pool: &PgPool, id: Uuid, changes: UpdateSensor) -> Result<Sensor, AppError> {
    sqlx::query_as::<_, Sensor>(
        "UPDATE sensors SET \
            kind = COALESCE($2, kind), \
            unit = COALESCE($3, unit), \
            model = COALESCE($4, model), \
            location = COALESCE($5, location), \
            is_active = COALESCE($6, is_active) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(changes.kind)
    .bind(changes.unit)
    .bind(changes.model)
    .bind(changes.location)
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("sensor"))
}

/// Unconditional delete; only the deletion guard calls this.
pub async fn delete(exec: impl PgExecutor<'_>, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM sensors WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("sensor"));
    }
    Ok(())
}
