use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::{DeviceStatus, Role, SensorKind};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    /// Write-only; stored hashed, never returned.
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateZone {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZone {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSensor {
    #[serde(rename = "type")]
    pub kind: Option<SensorKind>,
    pub unit: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSensor {
    #[serde(rename = "type")]
    pub kind: Option<SensorKind>,
    pub unit: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Reference fields arrive as raw id strings and go through the reference
/// validator before the write; a malformed value is reported per field
/// rather than as a body-wide parse failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDevice {
    pub serial_number: String,
    pub model: Option<String>,
    pub status: Option<DeviceStatus>,
    pub installed_at: Option<DateTime<Utc>>,
    /// Id of the owning user.
    pub owner_id: Option<String>,
    /// Id of the zone the device is installed in.
    pub zone_id: Option<String>,
    /// Ids of the attached sensors, in order.
    pub sensors: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevice {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: Option<DeviceStatus>,
    pub installed_at: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
    pub zone_id: Option<String>,
    pub sensors: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReading {
    /// Id of the sensor that produced the reading; must be active.
    pub sensor_id: String,
    pub time: Option<DateTime<Utc>>,
    pub value: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReading {
    pub sensor_id: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TimeRangeParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body of a successful DELETE.
#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
}

/// Per-entity record counts, served by the debug endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionCounts {
    pub users: i64,
    pub zones: i64,
    pub sensors: i64,
    pub devices: i64,
    pub readings: i64,
}
