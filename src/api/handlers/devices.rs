use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    api::{
        dto::{CreateDevice, Deleted, UpdateDevice},
        extract,
    },
    db::models::Device,
    errors::AppError,
    integrity::refs,
    store::{self, devices},
};

/// List all registered devices.
#[utoipa::path(
    get,
    path = "/devices",
    responses(
        (status = 200, description = "All devices", body = Vec<Device>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "devices"
)]
pub async fn list_devices(State(pool): State<PgPool>) -> Result<Json<Vec<Device>>, AppError> {
    Ok(Json(devices::list(&pool).await?))
}

/// Fetch a single device by id.
#[utoipa::path(
    get,
    path = "/devices/{id}",
    params(("id" = String, Path, description = "Device id")),
    responses(
        (status = 200, description = "The device", body = Device),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such device"),
    ),
    tag = "devices"
)]
pub async fn get_device(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Device>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(devices::get(&pool, id).await?))
}

/// Register a device. Every reference supplied in the payload (ownerId,
/// zoneId, each sensors entry) must resolve to an existing record.
#[utoipa::path(
    post,
    path = "/devices",
    request_body = CreateDevice,
    responses(
        (status = 201, description = "Device created", body = Device),
        (status = 400, description = "Missing field or unresolvable reference"),
        (status = 409, description = "Serial number already registered"),
    ),
    tag = "devices"
)]
pub async fn create_device(
    State(pool): State<PgPool>,
    extract::Json(payload): extract::Json<CreateDevice>,
) -> Result<(StatusCode, Json<Device>), AppError> {
    let refs = refs::resolve_device_refs(
        &pool,
        payload.owner_id.as_deref(),
        payload.zone_id.as_deref(),
        payload.sensors.as_deref(),
    )
    .await?;
    let device = devices::create(&pool, payload, refs).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Partially update a device. Only references present in the payload are
/// re-validated; untouched fields keep their previously verified values.
#[utoipa::path(
    patch,
    path = "/devices/{id}",
    params(("id" = String, Path, description = "Device id")),
    request_body = UpdateDevice,
    responses(
        (status = 200, description = "Updated device", body = Device),
        (status = 400, description = "Malformed id, invalid field or unresolvable reference"),
        (status = 404, description = "No such device"),
        (status = 409, description = "Serial number already registered"),
    ),
    tag = "devices"
)]
pub async fn update_device(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    extract::Json(changes): extract::Json<UpdateDevice>,
) -> Result<Json<Device>, AppError> {
    let id = store::parse_id(&id)?;
    let refs = refs::resolve_device_refs(
        &pool,
        changes.owner_id.as_deref(),
        changes.zone_id.as_deref(),
        changes.sensors.as_deref(),
    )
    .await?;
    Ok(Json(devices::update(&pool, id, changes, refs).await?))
}

/// Delete a device. Unguarded: nothing references devices.
#[utoipa::path(
    delete,
    path = "/devices/{id}",
    params(("id" = String, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device deleted", body = Deleted),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such device"),
    ),
    tag = "devices"
)]
pub async fn delete_device(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = store::parse_id(&id)?;
    devices::delete(&pool, id).await?;
    Ok(Json(Deleted { id }))
}
