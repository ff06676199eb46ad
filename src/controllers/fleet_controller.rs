//! Controller de métricas de flota
//!
//! Carga las tres colecciones y delega en el agregador puro. `as_of`
//! entra por query param; solo acá, en el borde, se lee el reloj como
//! default.

use chrono::Utc;
use sqlx::PgPool;

use crate::dto::fleet_dto::{
    AlertsQuery, FleetSnapshotResponse, MaintenanceAlertResponse, SnapshotQuery,
};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::fleet_aggregator;
use crate::utils::errors::AppError;

pub struct FleetController {
    vehicles: VehicleRepository,
    reservations: ReservationRepository,
    maintenance: MaintenanceRepository,
}

impl FleetController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            maintenance: MaintenanceRepository::new(pool),
        }
    }

    pub async fn snapshot(&self, query: SnapshotQuery) -> Result<FleetSnapshotResponse, AppError> {
        let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());

        let vehicles = self.vehicles.find_all(None).await?;
        let reservations = self.reservations.find_all(None).await?;
        let schedules = self.maintenance.find_all().await?;

        let snapshot = fleet_aggregator::snapshot(&vehicles, &reservations, &schedules, as_of);
        Ok(snapshot.into())
    }

    pub async fn maintenance_alerts(
        &self,
        query: AlertsQuery,
    ) -> Result<Vec<MaintenanceAlertResponse>, AppError> {
        let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let horizon = query
            .horizon_days
            .unwrap_or(fleet_aggregator::DEFAULT_ALERT_HORIZON_DAYS);

        if horizon < 0 {
            return Err(AppError::Validation(
                "horizonDays must be non-negative".to_string(),
            ));
        }

        let schedules = self.maintenance.find_all().await?;
        let alerts = fleet_aggregator::urgent_maintenance_alerts(&schedules, as_of, horizon);
        Ok(alerts.into_iter().map(Into::into).collect())
    }
}
