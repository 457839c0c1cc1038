use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    store::{devices, readings, sensors, users, zones},
};

/// Delete a user unless any device still names it as owner.
///
/// The dependent count and the delete share one transaction, so the check
/// cannot observe rows from a delete that later rolls back. A dependent
/// insert committing between the count and our commit can still slip
/// through under READ COMMITTED; the window is accepted and documented.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let count = devices::count_by_owner(&mut *tx, id).await?;
    if count > 0 {
        return Err(AppError::HasDependents {
            entity: "user",
            dependents: "devices",
            count,
        });
    }
    users::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(())
}

/// Delete a zone unless any device still names it.
pub async fn delete_zone(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let count = devices::count_by_zone(&mut *tx, id).await?;
    if count > 0 {
        return Err(AppError::HasDependents {
            entity: "zone",
            dependents: "devices",
            count,
        });
    }
    zones::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(())
}

/// Delete a sensor unless readings reference it. A device listing the
/// sensor does not block deletion; the device is left with a dangling id.
pub async fn delete_sensor(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let count = readings::count_by_sensor(&mut *tx, id).await?;
    if count > 0 {
        return Err(AppError::HasDependents {
            entity: "sensor",
            dependents: "readings",
            count,
        });
    }
    sensors::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(())
}
