use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    api::dto::{CreateReading, UpdateReading},
    db::models::Reading,
    errors::AppError,
};

/// Inserts a reading. `sensor_id` must come out of the reference validator.
pub async fn create(
    pool: &PgPool,
    payload: CreateReading,
    sensor_id: Uuid,
) -> Result<Reading, AppError> {
    let reading = sqlx::query_as::<_, Reading>(
        "INSERT INTO readings (id, sensor_id, time, value) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(sensor_id)
    .bind(payload.time)
    .bind(payload.value)
    .fetch_one(pool)
    .await?;
    Ok(reading)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Reading, AppError> {
    sqlx::query_as::<_, Reading>("SELECT * FROM readings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("reading"))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Reading>, AppError> {
    let readings = sqlx::query_as::<_, Reading>("SELECT * FROM readings")
        .fetch_all(pool)
        .await?;
    Ok(readings)
}

/// Time-series lookup for one sensor, newest first, optionally bounded by an
/// inclusive `[from, to]` range. Backed by the (sensor_id, time DESC) index.
pub async fn list_by_sensor(
    pool: &PgPool,
    sensor_id: Uuid,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<Reading>, AppError> {
    let readings = sqlx::query_as::<_, Reading>(
        "SELECT * FROM readings \
         WHERE sensor_id = $1 \
           AND ($2::timestamptz IS NULL OR time >= $2) \
           AND ($3::timestamptz IS NULL OR time <= $3) \
         ORDER BY time DESC",
    )
    .bind(sensor_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(readings)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: UpdateReading,
    sensor_id: Option<Uuid>,
) -> Result<Reading, AppError> {
    sqlx::query_as::<_, Reading>(
        "UPDATE readings SET \
            sensor_id = COALESCE($2, sensor_id), \
            time = COALESCE($3, time), \
            value = COALESCE($4, value) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(sensor_id)
    .bind(changes.time)
    .bind(changes.value)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("reading"))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM readings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("reading"));
    }
    Ok(())
}

/// Number of readings recorded against `sensor_id`.
pub async fn count_by_sensor(exec: impl PgExecutor<'_>, sensor_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM readings WHERE sensor_id = $1")
        .bind(sensor_id)
        .fetch_one(exec)
        .await?;
    Ok(count)
}
