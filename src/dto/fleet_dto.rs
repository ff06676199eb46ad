//! DTOs de métricas de flota

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fleet::{FleetSnapshot, MaintenanceAlert};

/// Query params del snapshot. `asOf` por defecto es la fecha del día,
/// pero siempre viaja explícita hacia el agregador.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotQuery {
    pub as_of: Option<NaiveDate>,
}

/// Query params de las alertas de mantenimiento
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsQuery {
    pub as_of: Option<NaiveDate>,
    pub horizon_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshotResponse {
    pub as_of: NaiveDate,
    pub total_vehicles: i64,
    pub available_vehicles: i64,
    pub in_use_vehicles: i64,
    pub maintenance_vehicles: i64,
    pub offline_vehicles: i64,
    pub utilization_rate: i64,
    pub active_reservations: i64,
    pub pending_maintenance: i64,
    pub overdue_maintenance: i64,
    pub total_revenue: Decimal,
}

impl From<FleetSnapshot> for FleetSnapshotResponse {
    fn from(s: FleetSnapshot) -> Self {
        Self {
            as_of: s.as_of,
            total_vehicles: s.total_vehicles,
            available_vehicles: s.available_vehicles,
            in_use_vehicles: s.in_use_vehicles,
            maintenance_vehicles: s.maintenance_vehicles,
            offline_vehicles: s.offline_vehicles,
            utilization_rate: s.utilization_rate,
            active_reservations: s.active_reservations,
            pending_maintenance: s.pending_maintenance,
            overdue_maintenance: s.overdue_maintenance,
            total_revenue: s.total_revenue,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceAlertResponse {
    pub schedule_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub scheduled_date: NaiveDate,
    pub days_until_due: i64,
    pub overdue: bool,
}

impl From<MaintenanceAlert> for MaintenanceAlertResponse {
    fn from(a: MaintenanceAlert) -> Self {
        Self {
            schedule_id: a.schedule_id,
            vehicle_id: a.vehicle_id,
            service_type: a.service_type,
            scheduled_date: a.scheduled_date,
            days_until_due: a.days_until_due,
            overdue: a.overdue,
        }
    }
}
