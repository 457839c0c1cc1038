use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{required_text, required_text_opt};
use crate::{
    api::dto::{CreateDevice, UpdateDevice},
    db::models::Device,
    errors::{unique_conflict, AppError},
    integrity::refs::DeviceRefs,
};

/// Inserts a device. `refs` must come out of the reference validator; the
/// raw id strings on the payload are ignored here.
pub async fn create(
    pool: &PgPool,
    payload: CreateDevice,
    refs: DeviceRefs,
) -> Result<Device, AppError> {
    let serial_number = required_text("serialNumber", &payload.serial_number)?;

    sqlx::query_as::<_, Device>(
        "INSERT INTO devices \
            (id, serial_number, model, status, installed_at, owner_id, zone_id, sensors) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(serial_number)
    .bind(payload.model)
    .bind(payload.status)
    .bind(payload.installed_at)
    .bind(refs.owner_id)
    .bind(refs.zone_id)
    .bind(refs.sensors.unwrap_or_default())
    .fetch_one(pool)
    .await
    .map_err(unique_conflict("serialNumber"))
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Device, AppError> {
    sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("device"))
}

pub async fn list(pool: &PgPool) -> Result<Vec<Device>, AppError> {
    let devices = sqlx::query_as::<_, Device>("SELECT * FROM devices")
        .fetch_all(pool)
        .await?;
    Ok(devices)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: UpdateDevice,
    refs: DeviceRefs,
) -> Result<Device, AppError> {
    let serial_number = required_text_opt("serialNumber", changes.serial_number.as_deref())?;

    sqlx::query_as::<_, Device>(
        "UPDATE devices SET \
            serial_number = COALESCE($2, serial_number), \
            model = COALESCE($3, model), \
            status = COALESCE($4, status), \
            installed_at = COALESCE($5, installed_at), \
            owner_id = COALESCE($6, owner_id), \
            zone_id = COALESCE($7, zone_id), \
            sensors = COALESCE($8, sensors) \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(id)
    .bind(serial_number)
    .bind(changes.model)
    .bind(changes.status)
    .bind(changes.installed_at)
    .bind(refs.owner_id)
    .bind(refs.zone_id)
    .bind(refs.sensors)
    .fetch_optional(pool)
    .await
    .map_err(unique_conflict("serialNumber"))?
    .ok_or(AppError::NotFound("device"))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM devices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("device"));
    }
    Ok(())
}

/// Number of devices whose ownerId is `owner_id`.
pub async fn count_by_owner(exec: impl PgExecutor<'_>, owner_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM devices WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(exec)
        .await?;
    Ok(count)
}

/// Number of devices whose zoneId is `zone_id`.
pub async fn count_by_zone(exec: impl PgExecutor<'_>, zone_id: Uuid) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM devices WHERE zone_id = $1")
        .bind(zone_id)
        .fetch_one(exec)
        .await?;
    Ok(count)
}
