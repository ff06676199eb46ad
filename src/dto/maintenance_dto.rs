//! DTOs de mantenimiento

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance::{MaintenanceSchedule, MaintenanceStatus};

/// Request para programar un servicio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub service_type: String,

    pub scheduled_date: NaiveDate,
}

/// Request para completar un servicio - el costo recién se conoce acá
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMaintenanceRequest {
    /// Por defecto, la fecha del día del request
    pub completed_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
}

/// Response de mantenimiento para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<MaintenanceSchedule> for MaintenanceResponse {
    fn from(s: MaintenanceSchedule) -> Self {
        Self {
            id: s.id,
            vehicle_id: s.vehicle_id,
            service_type: s.service_type,
            scheduled_date: s.scheduled_date,
            completed_date: s.completed_date,
            status: s.status,
            cost: s.cost,
            created_at: s.created_at,
        }
    }
}
