//! Wipes the database and repopulates it with a small sample dataset.
//!
//! Inserts go through the store and integrity layers, so the seed exercises
//! the same validation path as the API.
//!
//! Usage:
//!   cargo run --bin seed

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use asset_tracking_service::{
    api::dto::{CreateDevice, CreateReading, CreateSensor, CreateUser, CreateZone},
    config::Config,
    db,
    db::models::{DeviceStatus, Role, SensorKind},
    integrity::refs,
    store,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    info!("Clearing existing records");
    for table in ["readings", "devices", "sensors", "zones", "users"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&pool).await?;
    }

    info!("Inserting users");
    let admin = create_user(&pool, "Admin", "admin@example.com", Role::Admin).await?;
    let tech = create_user(&pool, "Tech", "tech@example.com", Role::Technician).await?;
    create_user(&pool, "Viewer", "viewer@example.com", Role::Viewer).await?;

    info!("Inserting zones");
    let zone_a = create_zone(&pool, "Zona A", "Primer sector").await?;
    let zone_b = create_zone(&pool, "Zona B", "Segundo sector").await?;

    info!("Inserting sensors");
    let temp =
        store::sensors::create(&pool, sensor(SensorKind::Temperature, "°C", "T1000", "Sala 1"))
            .await?;
    let hum = store::sensors::create(&pool, sensor(SensorKind::Humidity, "%", "H2000", "Sala 2"))
        .await?;
    let co2 = store::sensors::create(&pool, sensor(SensorKind::Co2, "ppm", "C3000", "Sala 3"))
        .await?;

    info!("Inserting devices");
    create_device(
        &pool,
        "DEV-0001",
        "D-X",
        DeviceStatus::Active,
        &tech.id.to_string(),
        &zone_a.id.to_string(),
        vec![temp.id.to_string(), hum.id.to_string()],
    )
    .await?;
    create_device(
        &pool,
        "DEV-0002",
        "D-Y",
        DeviceStatus::Maintenance,
        &admin.id.to_string(),
        &zone_b.id.to_string(),
        vec![co2.id.to_string()],
    )
    .await?;

    info!("Inserting readings");
    let now = Utc::now();
    for (sensor_id, time, value) in [
        (temp.id, now - Duration::minutes(10), 22.5),
        (temp.id, now - Duration::minutes(5), 22.8),
        (hum.id, now, 45.2),
        (co2.id, now, 600.0),
    ] {
        let verified = refs::resolve_reading_sensor(&pool, &sensor_id.to_string())
            .await
            .context("seed reading rejected")?;
        store::readings::create(
            &pool,
            CreateReading { sensor_id: sensor_id.to_string(), time: Some(time), value },
            verified,
        )
        .await?;
    }

    let users = store::users::list(&pool).await?.len();
    let zones = store::zones::list(&pool).await?.len();
    let sensors = store::sensors::list(&pool).await?.len();
    let devices = store::devices::list(&pool).await?.len();
    let readings = store::readings::list(&pool).await?.len();
    info!(users, zones, sensors, devices, readings, "Seed complete");

    Ok(())
}

async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    role: Role,
) -> Result<asset_tracking_service::db::models::User> {
    let user = store::users::create(
        pool,
        CreateUser {
            name: name.into(),
            email: email.into(),
            password: Some("secret".into()),
            role: Some(role),
        },
    )
    .await?;
    Ok(user)
}

async fn create_zone(
    pool: &PgPool,
    name: &str,
    description: &str,
) -> Result<asset_tracking_service::db::models::Zone> {
    let zone = store::zones::create(
        pool,
        CreateZone {
            name: name.into(),
            description: Some(description.into()),
            is_active: Some(true),
        },
    )
    .await?;
    Ok(zone)
}

fn sensor(kind: SensorKind, unit: &str, model: &str, location: &str) -> CreateSensor {
    CreateSensor {
        kind: Some(kind),
        unit: Some(unit.into()),
        model: Some(model.into()),
        location: Some(location.into()),
        is_active: Some(true),
    }
}

async fn create_device(
    pool: &PgPool,
    serial: &str,
    model: &str,
    status: DeviceStatus,
    owner_id: &str,
    zone_id: &str,
    sensors: Vec<String>,
) -> Result<()> {
    let refs = refs::resolve_device_refs(pool, Some(owner_id), Some(zone_id), Some(&sensors))
        .await
        .with_context(|| format!("seed device {serial} rejected"))?;
    store::devices::create(
        pool,
        CreateDevice {
            serial_number: serial.into(),
            model: Some(model.into()),
            status: Some(status),
            installed_at: Some(Utc::now()),
            owner_id: Some(owner_id.into()),
            zone_id: Some(zone_id.into()),
            sensors: Some(sensors),
        },
        refs,
    )
    .await?;
    Ok(())
}
