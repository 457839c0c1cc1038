pub mod devices;
pub mod readings;
pub mod sensors;
pub mod users;
pub mod zones;

use axum::{extract::State, Json};
use sqlx::PgPool;
use utoipa::OpenApi;

use crate::{api::dto::CollectionCounts, errors::AppError};

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Debug
// ---------------------------------------------------------------------------

/// Record counts per entity.
#[utoipa::path(
    get,
    path = "/debug/collections",
    responses(
        (status = 200, description = "Record counts per entity", body = CollectionCounts),
        (status = 500, description = "Internal server error"),
    ),
    tag = "system"
)]
pub async fn collection_counts(
    State(pool): State<PgPool>,
) -> Result<Json<CollectionCounts>, AppError> {
    let (users, zones, sensors, devices, readings) = tokio::try_join!(
        table_count(&pool, "users"),
        table_count(&pool, "zones"),
        table_count(&pool, "sensors"),
        table_count(&pool, "devices"),
        table_count(&pool, "readings"),
    )?;
    Ok(Json(CollectionCounts { users, zones, sensors, devices, readings }))
}

// `table` only ever comes from the fixed list above.
async fn table_count(pool: &PgPool, table: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        zones::list_zones,
        zones::get_zone,
        zones::create_zone,
        zones::update_zone,
        zones::delete_zone,
        sensors::list_sensors,
        sensors::get_sensor,
        sensors::create_sensor,
        sensors::update_sensor,
        sensors::delete_sensor,
        devices::list_devices,
        devices::get_device,
        devices::create_device,
        devices::update_device,
        devices::delete_device,
        readings::list_readings,
        readings::get_reading,
        readings::list_sensor_readings,
        readings::create_reading,
        readings::update_reading,
        readings::delete_reading,
        health,
        collection_counts,
    ),
    components(schemas(
        crate::db::models::User,
        crate::db::models::Zone,
        crate::db::models::Sensor,
        crate::db::models::Device,
        crate::db::models::Reading,
        crate::db::models::Role,
        crate::db::models::SensorKind,
        crate::db::models::DeviceStatus,
        crate::api::dto::CreateUser,
        crate::api::dto::UpdateUser,
        crate::api::dto::CreateZone,
        crate::api::dto::UpdateZone,
        crate::api::dto::CreateSensor,
        crate::api::dto::UpdateSensor,
        crate::api::dto::CreateDevice,
        crate::api::dto::UpdateDevice,
        crate::api::dto::CreateReading,
        crate::api::dto::UpdateReading,
        crate::api::dto::Deleted,
        crate::api::dto::CollectionCounts,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "zones", description = "Installation zones"),
        (name = "sensors", description = "Sensor registry"),
        (name = "devices", description = "Tracked devices"),
        (name = "readings", description = "Sensor readings"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "Asset Tracking API",
        version = "0.1.0",
        description = "REST API for IoT asset tracking: users, zones, sensors, devices and readings"
    )
)]
pub struct ApiDoc;
