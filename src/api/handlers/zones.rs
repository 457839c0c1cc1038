use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    api::{
        dto::{CreateZone, Deleted, UpdateZone},
        extract,
    },
    db::models::Zone,
    errors::AppError,
    integrity::guard,
    store::{self, zones},
};

/// List all zones.
#[utoipa::path(
    get,
    path = "/zones",
    responses(
        (status = 200, description = "All zones", body = Vec<Zone>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "zones"
)]
pub async fn list_zones(State(pool): State<PgPool>) -> Result<Json<Vec<Zone>>, AppError> {
    Ok(Json(zones::list(&pool).await?))
}

/// Fetch a single zone by id.
#[utoipa::path(
    get,
    path = "/zones/{id}",
    params(("id" = String, Path, description = "Zone id")),
    responses(
        (status = 200, description = "The zone", body = Zone),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such zone"),
    ),
    tag = "zones"
)]
pub async fn get_zone(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Zone>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(zones::get(&pool, id).await?))
}

/// Create a zone.
#[utoipa::path(
    post,
    path = "/zones",
    request_body = CreateZone,
    responses(
        (status = 201, description = "Zone created", body = Zone),
        (status = 400, description = "Missing or invalid field"),
    ),
    tag = "zones"
)]
pub async fn create_zone(
    State(pool): State<PgPool>,
    extract::Json(payload): extract::Json<CreateZone>,
) -> Result<(StatusCode, Json<Zone>), AppError> {
    let zone = zones::create(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Partially update a zone.
#[utoipa::path(
    patch,
    path = "/zones/{id}",
    params(("id" = String, Path, description = "Zone id")),
    request_body = UpdateZone,
    responses(
        (status = 200, description = "Updated zone", body = Zone),
        (status = 400, description = "Malformed id or invalid field"),
        (status = 404, description = "No such zone"),
    ),
    tag = "zones"
)]
pub async fn update_zone(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    extract::Json(changes): extract::Json<UpdateZone>,
) -> Result<Json<Zone>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(zones::update(&pool, id, changes).await?))
}

/// Delete a zone. Refused while any device is installed in it.
#[utoipa::path(
    delete,
    path = "/zones/{id}",
    params(("id" = String, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Zone deleted", body = Deleted),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such zone"),
        (status = 409, description = "Devices are still assigned to the zone"),
    ),
    tag = "zones"
)]
pub async fn delete_zone(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = store::parse_id(&id)?;
    guard::delete_zone(&pool, id).await?;
    Ok(Json(Deleted { id }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;

    use crate::api::router;

    fn test_server(pool: PgPool) -> TestServer {
        TestServer::new(router(pool)).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_and_fetch_zone(pool: PgPool) {
        let server = test_server(pool);
        let created: Value = server
            .post("/zones")
            .json(&json!({ "name": "Zona A", "description": "Primer sector", "isActive": true }))
            .await
            .json();
        let id = created["id"].as_str().unwrap();

        let fetched: Value = server.get(&format!("/zones/{id}")).await.json();
        assert_eq!(fetched["name"], "Zona A");
        assert_eq!(fetched["description"], "Primer sector");
        assert_eq!(fetched["isActive"], true);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_requires_name(pool: PgPool) {
        let server = test_server(pool);
        server
            .post("/zones")
            .json(&json!({ "description": "sin nombre" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    // The full lifecycle: a zone with a device cannot be deleted until the
    // device goes away.
    #[sqlx::test(migrations = "./migrations")]
    async fn zone_device_lifecycle(pool: PgPool) {
        let server = test_server(pool);

        let zone: Value = server
            .post("/zones")
            .json(&json!({ "name": "Zona A" }))
            .await
            .json();
        let zone_id = zone["id"].as_str().unwrap();

        let user: Value = server
            .post("/users")
            .json(&json!({ "name": "Tech", "email": "tech@x.com", "role": "technician" }))
            .await
            .json();
        let user_id = user["id"].as_str().unwrap();

        let sensor: Value = server
            .post("/sensors")
            .json(&json!({ "type": "temperature", "unit": "C", "isActive": true }))
            .await
            .json();
        let sensor_id = sensor["id"].as_str().unwrap();

        let resp = server
            .post("/devices")
            .json(&json!({
                "serialNumber": "DEV-1",
                "ownerId": user_id,
                "zoneId": zone_id,
                "sensors": [sensor_id]
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let device: Value = resp.json();
        assert_eq!(device["ownerId"], *user_id);
        assert_eq!(device["zoneId"], *zone_id);
        assert_eq!(device["sensors"], json!([sensor_id]));
        let device_id = device["id"].as_str().unwrap();

        // Blocked: the device still references the zone.
        let resp = server.delete(&format!("/zones/{zone_id}")).await;
        resp.assert_status(StatusCode::CONFLICT);
        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains('1'));

        server
            .delete(&format!("/devices/{device_id}"))
            .await
            .assert_status_ok();
        server
            .delete(&format!("/zones/{zone_id}"))
            .await
            .assert_status_ok();
    }
}
