use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    api::{
        dto::{CreateSensor, Deleted, UpdateSensor},
        extract,
    },
    db::models::Sensor,
    errors::AppError,
    integrity::guard,
    store::{self, sensors},
};

/// List all sensors.
#[utoipa::path(
    get,
    path = "/sensors",
    responses(
        (status = 200, description = "All sensors", body = Vec<Sensor>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(State(pool): State<PgPool>) -> Result<Json<Vec<Sensor>>, AppError> {
    Ok(Json(sensors::list(&pool).await?))
}

/// Fetch a single sensor by id.
#[utoipa::path(
    get,
    path = "/sensors/{id}",
    params(("id" = String, Path, description = "Sensor id")),
    responses(
        (status = 200, description = "The sensor", body = Sensor),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such sensor"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Sensor>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(sensors::get(&pool, id).await?))
}

/// Register a sensor.
#[utoipa::path(
    post,
    path = "/sensors",
    request_body = CreateSensor,
    responses(
        (status = 201, description = "Sensor created", body = Sensor),
        (status = 400, description = "Invalid field"),
    ),
    tag = "sensors"
)]
pub async fn create_sensor(
    State(pool): State<PgPool>,
    extract::Json(payload): extract::Json<CreateSensor>,
) -> Result<(StatusCode, Json<Sensor>), AppError> {
    let sensor = sensors::create(&pool, payload).await?;
    Ok((StatusCode::CREATED, Json(sensor)))
}

/// Partially update a sensor.
#[utoipa::path(
    patch,
    path = "/sensors/{id}",
    params(("id" = String, Path, description = "Sensor id")),
    request_body = UpdateSensor,
    responses(
        (status = 200, description = "Updated sensor", body = Sensor),
        (status = 400, description = "Malformed id or invalid field"),
        (status = 404, description = "No such sensor"),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    extract::Json(changes): extract::Json<UpdateSensor>,
) -> Result<Json<Sensor>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(sensors::update(&pool, id, changes).await?))
}

/// Delete a sensor. Refused while readings reference it; a device listing
/// the sensor does not block deletion.
#[utoipa::path(
    delete,
    path = "/sensors/{id}",
    params(("id" = String, Path, description = "Sensor id")),
    responses(
        (status = 200, description = "Sensor deleted", body = Deleted),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such sensor"),
        (status = 409, description = "Readings are still recorded against the sensor"),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = store::parse_id(&id)?;
    guard::delete_sensor(&pool, id).await?;
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

    async fn create_sensor(server: &TestServer, body: Value) -> Value {
        let resp = server.post("/sensors").json(&body).await;
        resp.assert_status(StatusCode::CREATED);
        resp.json()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_round_trips_all_fields(pool: PgPool) {
        let server = test_server(pool);
        let sensor = create_sensor(
            &server,
            json!({
                "type": "co2",
                "unit": "ppm",
                "model": "C3000",
                "location": "Sala 3",
                "isActive": true
            }),
        )
        .await;

        assert_eq!(sensor["type"], "co2");
        assert_eq!(sensor["unit"], "ppm");
        assert_eq!(sensor["model"], "C3000");
        assert_eq!(sensor["location"], "Sala 3");
        assert_eq!(sensor["isActive"], true);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unknown_type_is_rejected_naming_the_variants(pool: PgPool) {
        let server = test_server(pool);
        let resp = server
            .post("/sensors")
            .json(&json!({ "type": "pressure" }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("pressure"));
        assert!(message.contains("temperature"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_blocked_by_readings(pool: PgPool) {
        let server = test_server(pool);
        let sensor = create_sensor(&server, json!({ "type": "temperature", "isActive": true })).await;
        let sensor_id = sensor["id"].as_str().unwrap();

        server
            .post("/readings")
            .json(&json!({ "sensorId": sensor_id, "value": 22.5 }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format!("/sensors/{sensor_id}"))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    // A device listing the sensor does not protect it; the device keeps a
    // dangling id afterwards.
    #[sqlx::test(migrations = "./migrations")]
    async fn delete_ignores_device_references(pool: PgPool) {
        let server = test_server(pool);
        let sensor = create_sensor(&server, json!({ "type": "noise", "isActive": true })).await;
        let sensor_id = sensor["id"].as_str().unwrap();

        let device: Value = server
            .post("/devices")
            .json(&json!({ "serialNumber": "DEV-1", "sensors": [sensor_id] }))
            .await
            .json();

        server
            .delete(&format!("/sensors/{sensor_id}"))
            .await
            .assert_status_ok();

        let device: Value = server
            .get(&format!("/devices/{}", device["id"].as_str().unwrap()))
            .await
            .json();
        assert_eq!(device["sensors"], json!([sensor_id]));
    }
}
