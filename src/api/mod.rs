pub mod dto;
pub mod extract;
pub mod handlers;

use axum::{routing::get, Router};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

pub fn router(pool: PgPool) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/users", get(handlers::users::list_users).post(handlers::users::create_user))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/zones", get(handlers::zones::list_zones).post(handlers::zones::create_zone))
        .route(
            "/zones/{id}",
            get(handlers::zones::get_zone)
                .patch(handlers::zones::update_zone)
                .delete(handlers::zones::delete_zone),
        )
        .route(
            "/sensors",
            get(handlers::sensors::list_sensors).post(handlers::sensors::create_sensor),
        )
        .route(
            "/sensors/{id}",
            get(handlers::sensors::get_sensor)
                .patch(handlers::sensors::update_sensor)
                .delete(handlers::sensors::delete_sensor),
        )
        .route(
            "/devices",
            get(handlers::devices::list_devices).post(handlers::devices::create_device),
        )
        .route(
            "/devices/{id}",
            get(handlers::devices::get_device)
                .patch(handlers::devices::update_device)
                .delete(handlers::devices::delete_device),
        )
        .route(
            "/readings",
            get(handlers::readings::list_readings).post(handlers::readings::create_reading),
        )
        .route(
            "/readings/sensor/{sensorId}",
            get(handlers::readings::list_sensor_readings),
        )
        .route(
            "/readings/{id}",
            get(handlers::readings::get_reading)
                .patch(handlers::readings::update_reading)
                .delete(handlers::readings::delete_reading),
        )
        .route("/debug/collections", get(handlers::collection_counts))
        .with_state(pool)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
