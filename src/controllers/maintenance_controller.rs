//! Controller de mantenimientos
//!
//! Programación y cierre de servicios. Programar un servicio ya vencido o
//! en fecha pone el vehículo en maintenance; completar el servicio lo
//! libera si no queda otro pendiente en fecha.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CreateMaintenanceRequest, MaintenanceResponse,
};
use crate::dto::ApiResponse;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct MaintenanceController {
    repository: MaintenanceRepository,
    vehicles: VehicleRepository,
}

impl MaintenanceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MaintenanceRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let schedule = self
            .repository
            .create(vehicle.id, request.service_type, request.scheduled_date)
            .await?;

        // Servicio ya en fecha: el vehículo entra a taller de inmediato.
        // Un vehículo in_use no se saca de una reserva en curso.
        let today = Utc::now().date_naive();
        if schedule.is_due(today) && vehicle.status == VehicleStatus::Available {
            self.vehicles
                .set_status(vehicle.id, VehicleStatus::Maintenance)
                .await?;
        }

        Ok(ApiResponse::success_with_message(
            schedule.into(),
            "Mantenimiento programado".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<MaintenanceResponse, AppError> {
        let schedule = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mantenimiento no encontrado".to_string()))?;

        Ok(schedule.into())
    }

    pub async fn list_by_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<MaintenanceResponse>, AppError> {
        let schedules = self.repository.find_by_vehicle(vehicle_id).await?;
        Ok(schedules.into_iter().map(Into::into).collect())
    }

    /// Completar el servicio (pending -> completed, una sola vez) y liberar
    /// el vehículo si no queda otro mantenimiento pendiente en fecha.
    pub async fn complete(
        &self,
        id: Uuid,
        request: CompleteMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceResponse>, AppError> {
        let today = Utc::now().date_naive();
        let completed_date = request.completed_date.unwrap_or(today);

        let schedule = self
            .repository
            .complete(id, completed_date, request.cost)
            .await?;

        let vehicle = self
            .vehicles
            .find_by_id(schedule.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status == VehicleStatus::Maintenance
            && !self.repository.open_due_exists(vehicle.id, today).await?
        {
            self.vehicles
                .set_status(vehicle.id, VehicleStatus::Available)
                .await?;
        }

        Ok(ApiResponse::success_with_message(
            schedule.into(),
            "Mantenimiento completado".to_string(),
        ))
    }
}
