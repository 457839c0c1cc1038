use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Reference fields of a device payload, resolved to verified ids. A `None`
/// field was absent from the payload and stays untouched by the write.
#[derive(Debug, Default)]
pub struct DeviceRefs {
    pub owner_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub sensors: Option<Vec<Uuid>>,
}

/// Resolve and verify the reference fields of a device payload, in declared
/// order: ownerId, zoneId, then each entry of sensors in list order. Stops
/// at the first failure. Only fields present in the payload are checked;
/// untouched fields were validated by the write that set them.
pub async fn resolve_device_refs(
    pool: &PgPool,
    owner_id: Option<&str>,
    zone_id: Option<&str>,
    sensors: Option<&[String]>,
) -> Result<DeviceRefs, AppError> {
    let owner_id = match owner_id {
        Some(raw) => {
            let id = parse_ref("ownerId", raw)?;
            if !user_exists(pool, id).await? {
                return Err(AppError::DanglingReference("ownerId"));
            }
            Some(id)
        }
        None => None,
    };

    let zone_id = match zone_id {
        Some(raw) => {
            let id = parse_ref("zoneId", raw)?;
            if !zone_exists(pool, id).await? {
                return Err(AppError::DanglingReference("zoneId"));
            }
            Some(id)
        }
        None => None,
    };

    let sensors = match sensors {
        Some(raws) => {
            let mut ids = Vec::with_capacity(raws.len());
            for raw in raws {
                let id = parse_ref("sensors", raw)?;
                if !sensor_exists(pool, id).await? {
                    return Err(AppError::DanglingReference("sensors"));
                }
                ids.push(id);
            }
            Some(ids)
        }
        None => None,
    };

    Ok(DeviceRefs { owner_id, zone_id, sensors })
}

/// Resolve a reading's sensor reference. The sensor must exist and be
/// active; a NULL isActive counts as inactive.
pub async fn resolve_reading_sensor(pool: &PgPool, raw: &str) -> Result<Uuid, AppError> {
    let id = parse_ref("sensorId", raw)?;
    let is_active: Option<Option<bool>> =
        sqlx::query_scalar("SELECT is_active FROM sensors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    match is_active {
        None => Err(AppError::DanglingReference("sensorId")),
        Some(active) if !active.unwrap_or(false) => Err(AppError::InactiveReference("sensorId")),
        Some(_) => Ok(id),
    }
}

fn parse_ref(field: &'static str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidReference(field))
}

async fn user_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

async fn zone_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM zones WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

async fn sensor_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sensors WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}
