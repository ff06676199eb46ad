//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes de estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
    Offline,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Offline => "offline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(VehicleStatus::Available),
            "in_use" => Some(VehicleStatus::InUse),
            "maintenance" => Some(VehicleStatus::Maintenance),
            "offline" => Some(VehicleStatus::Offline),
            _ => None,
        }
    }

    /// Un vehículo solo acepta reservas nuevas cuando está disponible
    pub fn is_bookable(&self) -> bool {
        matches!(self, VehicleStatus::Available)
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: Decimal,
    pub seats: i32,
    pub transmission: String,
    pub fuel_type: String,
    pub status: VehicleStatus,
    pub license_plate: String,
    pub next_maintenance_date: Option<NaiveDate>,
    pub utilization_rate: i32,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Flag derivado del estado - nunca se persiste por separado
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}
