//! Modelo de FleetSnapshot
//!
//! Agregado efímero: se recalcula en cada consulta, nunca se persiste.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Foto instantánea de la flota al momento `as_of`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleetSnapshot {
    pub as_of: NaiveDate,
    pub total_vehicles: i64,
    pub available_vehicles: i64,
    pub in_use_vehicles: i64,
    pub maintenance_vehicles: i64,
    pub offline_vehicles: i64,
    /// Porcentaje redondeado 0-100; 0 cuando la flota está vacía
    pub utilization_rate: i64,
    pub active_reservations: i64,
    pub pending_maintenance: i64,
    pub overdue_maintenance: i64,
    /// Solo reservas completadas cuentan como ingreso realizado
    pub total_revenue: Decimal,
}

/// Alerta de mantenimiento urgente (pendiente dentro del horizonte)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceAlert {
    pub schedule_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub scheduled_date: NaiveDate,
    /// Días hasta la fecha programada; negativo si ya venció
    pub days_until_due: i64,
    pub overdue: bool,
}
