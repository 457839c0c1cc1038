use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Mirrors the `user_role` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Technician,
    Viewer,
}

/// Mirrors the `sensor_kind` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sensor_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Co2,
    Noise,
}

/// Mirrors the `device_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "device_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Maintenance,
    Offline,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Salted HMAC-SHA-256 digest; never serialized into responses.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: Option<SensorKind>,
    pub unit: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,
    pub serial_number: String,
    pub model: Option<String>,
    pub status: Option<DeviceStatus>,
    pub installed_at: Option<DateTime<Utc>>,
    pub owner_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    /// Ordered list of sensor ids attached to this device.
    pub sensors: Vec<Uuid>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub time: Option<DateTime<Utc>>,
    pub value: f64,
}
