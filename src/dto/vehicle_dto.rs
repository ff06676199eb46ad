//! DTOs de vehículos

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus};

/// Request para dar de alta un vehículo en la flota
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1990, max = 2035))]
    pub year: i32,

    pub daily_rate: Decimal,

    #[validate(range(min = 1, max = 60))]
    pub seats: i32,

    #[validate(length(min = 2, max = 20))]
    pub transmission: String,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: String,

    #[validate(length(min = 5, max = 20))]
    pub license_plate: String,
}

/// Request para actualizar la tarifa diaria. El cambio no afecta reservas
/// existentes: cada una conserva su snapshot de tarifa.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRateRequest {
    pub daily_rate: Decimal,
}

/// Filtros para listados de flota
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: Decimal,
    pub seats: i32,
    pub transmission: String,
    pub fuel_type: String,
    pub status: VehicleStatus,
    pub is_available: bool,
    pub license_plate: String,
    pub next_maintenance_date: Option<NaiveDate>,
    pub utilization_rate: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        let is_available = v.is_available();
        Self {
            id: v.id,
            brand: v.brand,
            model: v.model,
            year: v.year,
            daily_rate: v.daily_rate,
            seats: v.seats,
            transmission: v.transmission,
            fuel_type: v.fuel_type,
            status: v.status,
            is_available,
            license_plate: v.license_plate,
            next_maintenance_date: v.next_maintenance_date,
            utilization_rate: v.utilization_rate,
            created_at: v.created_at,
        }
    }
}
