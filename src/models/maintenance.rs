//! Modelo de MaintenanceSchedule
//!
//! Mapea a la tabla maintenance_schedules. El costo solo se conoce
//! al completar el servicio.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del mantenimiento - mapea al ENUM maintenance_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "maintenance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::Completed => "completed",
        }
    }
}

/// MaintenanceSchedule principal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceSchedule {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceSchedule {
    /// Flag derivado: pendiente y con fecha programada vencida
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status == MaintenanceStatus::Pending && self.scheduled_date < as_of
    }

    /// Pendiente y con fecha programada alcanzada (hoy o antes)
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.status == MaintenanceStatus::Pending && self.scheduled_date <= as_of
    }
}
