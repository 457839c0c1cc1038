use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::{
    api::{
        dto::{CreateReading, Deleted, TimeRangeParams, UpdateReading},
        extract,
    },
    db::models::Reading,
    errors::AppError,
    integrity::refs,
    store::{self, readings},
};

/// List all readings.
#[utoipa::path(
    get,
    path = "/readings",
    responses(
        (status = 200, description = "All readings", body = Vec<Reading>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn list_readings(State(pool): State<PgPool>) -> Result<Json<Vec<Reading>>, AppError> {
    Ok(Json(readings::list(&pool).await?))
}

/// Fetch a single reading by id.
#[utoipa::path(
    get,
    path = "/readings/{id}",
    params(("id" = String, Path, description = "Reading id")),
    responses(
        (status = 200, description = "The reading", body = Reading),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such reading"),
    ),
    tag = "readings"
)]
pub async fn get_reading(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Reading>, AppError> {
    let id = store::parse_id(&id)?;
    Ok(Json(readings::get(&pool, id).await?))
}

/// Time-series readings for one sensor, newest first. Optionally bounded
/// with `?from=<RFC3339>&to=<RFC3339>`.
#[utoipa::path(
    get,
    path = "/readings/sensor/{sensorId}",
    params(
        ("sensorId" = String, Path, description = "Sensor id"),
        ("from" = Option<String>, Query, description = "Start of time range (RFC3339)"),
        ("to" = Option<String>, Query, description = "End of time range (RFC3339)"),
    ),
    responses(
        (status = 200, description = "Readings for the sensor", body = Vec<Reading>),
        (status = 400, description = "Malformed sensor id"),
    ),
    tag = "readings"
)]
pub async fn list_sensor_readings(
    State(pool): State<PgPool>,
    Path(sensor_id): Path<String>,
    Query(params): Query<TimeRangeParams>,
) -> Result<Json<Vec<Reading>>, AppError> {
    let sensor_id = store::parse_id(&sensor_id)?;
    Ok(Json(
        readings::list_by_sensor(&pool, sensor_id, params.from, params.to).await?,
    ))
}

/// Record a reading. The referenced sensor must exist and be active.
#[utoipa::path(
    post,
    path = "/readings",
    request_body = CreateReading,
    responses(
        (status = 201, description = "Reading created", body = Reading),
        (status = 400, description = "Missing field, unknown or inactive sensor"),
    ),
    tag = "readings"
)]
pub async fn create_reading(
    State(pool): State<PgPool>,
    extract::Json(payload): extract::Json<CreateReading>,
) -> Result<(StatusCode, Json<Reading>), AppError> {
    let sensor_id = refs::resolve_reading_sensor(&pool, &payload.sensor_id).await?;
    let reading = readings::create(&pool, payload, sensor_id).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

/// Partially update a reading. A supplied sensorId is re-validated; an
/// absent one keeps the previously verified value.
#[utoipa::path(
    patch,
    path = "/readings/{id}",
    params(("id" = String, Path, description = "Reading id")),
    request_body = UpdateReading,
    responses(
        (status = 200, description = "Updated reading", body = Reading),
        (status = 400, description = "Malformed id, unknown or inactive sensor"),
        (status = 404, description = "No such reading"),
    ),
    tag = "readings"
)]
pub async fn update_reading(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    extract::Json(changes): extract::Json<UpdateReading>,
) -> Result<Json<Reading>, AppError> {
    let id = store::parse_id(&id)?;
    let sensor_id = match changes.sensor_id.as_deref() {
        Some(raw) => Some(refs::resolve_reading_sensor(&pool, raw).await?),
        None => None,
    };
    Ok(Json(readings::update(&pool, id, changes, sensor_id).await?))
}

/// Delete a reading. Unguarded: nothing references readings.
#[utoipa::path(
    delete,
    path = "/readings/{id}",
    params(("id" = String, Path, description = "Reading id")),
    responses(
        (status = 200, description = "Reading deleted", body = Deleted),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such reading"),
    ),
    tag = "readings"
)]
pub async fn delete_reading(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = store::parse_id(&id)?;
    readings::delete(&pool, id).await?;
    Ok(Json(Deleted { id }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::api::router;

    fn test_server(pool: PgPool) -> TestServer {
        TestServer::new(router(pool)).unwrap()
    }

    async fn create_sensor(server: &TestServer, active: bool) -> String {
        let sensor: Value = server
            .post("/sensors")
            .json(&json!({ "type": "temperature", "unit": "C", "isActive": active }))
            .await
            .json();
        sensor["id"].as_str().unwrap().to_owned()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_against_active_sensor(pool: PgPool) {
        let server = test_server(pool);
        let sensor_id = create_sensor(&server, true).await;

        let resp = server
            .post("/readings")
            .json(&json!({
                "sensorId": sensor_id,
                "time": "2026-08-07T10:00:00Z",
                "value": 22.5
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);

        let reading: Value = resp.json();
        assert_eq!(reading["sensorId"], *sensor_id.as_str());
        assert_eq!(reading["value"], 22.5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn inactive_sensor_is_rejected(pool: PgPool) {
        let server = test_server(pool);
        let sensor_id = create_sensor(&server, false).await;

        let resp = server
            .post("/readings")
            .json(&json!({ "sensorId": sensor_id, "value": 22.5 }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["error"], "sensorId refers to an inactive sensor");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unknown_sensor_is_rejected(pool: PgPool) {
        let server = test_server(pool);
        let resp = server
            .post("/readings")
            .json(&json!({ "sensorId": Uuid::new_v4(), "value": 22.5 }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["error"], "sensorId does not exist");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn value_is_required(pool: PgPool) {
        let server = test_server(pool);
        let sensor_id = create_sensor(&server, true).await;

        server
            .post("/readings")
            .json(&json!({ "sensorId": sensor_id }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn sensor_series_is_filtered_and_newest_first(pool: PgPool) {
        let server = test_server(pool);
        let sensor_id = create_sensor(&server, true).await;
        let other_id = create_sensor(&server, true).await;

        for (time, value) in [
            ("2026-08-07T10:00:00Z", 22.5),
            ("2026-08-07T10:05:00Z", 22.8),
            ("2026-08-07T10:10:00Z", 23.1),
        ] {
            server
                .post("/readings")
                .json(&json!({ "sensorId": sensor_id, "time": time, "value": value }))
                .await
                .assert_status(StatusCode::CREATED);
        }
        server
            .post("/readings")
            .json(&json!({ "sensorId": other_id, "time": "2026-08-07T10:00:00Z", "value": 45.2 }))
            .await
            .assert_status(StatusCode::CREATED);

        let all: Vec<Value> = server
            .get(&format!("/readings/sensor/{sensor_id}"))
            .await
            .json();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0]["value"], 23.1);
        assert_eq!(all[2]["value"], 22.5);

        let bounded: Vec<Value> = server
            .get(&format!(
                "/readings/sensor/{sensor_id}?from=2026-08-07T10:01:00Z&to=2026-08-07T10:09:00Z"
            ))
            .await
            .json();
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded[0]["value"], 22.8);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn patch_value_keeps_sensor(pool: PgPool) {
        let server = test_server(pool);
        let sensor_id = create_sensor(&server, true).await;

        let reading: Value = server
            .post("/readings")
            .json(&json!({ "sensorId": sensor_id, "value": 22.5 }))
            .await
            .json();
        let id = reading["id"].as_str().unwrap();

        let resp = server
            .patch(&format!("/readings/{id}"))
            .json(&json!({ "value": 23.0 }))
            .await;
        resp.assert_status_ok();

        let patched: Value = resp.json();
        assert_eq!(patched["value"], 23.0);
        assert_eq!(patched["sensorId"], *sensor_id.as_str());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn patch_to_inactive_sensor_is_rejected(pool: PgPool) {
        let server = test_server(pool);
        let active_id = create_sensor(&server, true).await;
        let inactive_id = create_sensor(&server, false).await;

        let reading: Value = server
            .post("/readings")
            .json(&json!({ "sensorId": active_id, "value": 22.5 }))
            .await
            .json();
        let id = reading["id"].as_str().unwrap();

        server
            .patch(&format!("/readings/{id}"))
            .json(&json!({ "sensorId": inactive_id }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
