//! Controller de vehículos
//!
//! Alta y administración de la flota. El borrado es condicional: un
//! vehículo con historial de reservas nunca se elimina, se retira
//! (status -> offline) para preservar la integridad del historial.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateRateRequest, VehicleFilters, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if request.daily_rate <= rust_decimal::Decimal::ZERO {
            return Err(AppError::Validation(
                "dailyRate must be positive".to_string(),
            ));
        }

        if self
            .repository
            .license_plate_exists(&request.license_plate)
            .await?
        {
            return Err(AppError::Conflict(
                "La matrícula ya está registrada".to_string(),
            ));
        }

        let vehicle = self
            .repository
            .create(
                request.brand,
                request.model,
                request.year,
                request.daily_rate,
                request.seats,
                request.transmission,
                request.fuel_type,
                request.license_plate,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self, filters: VehicleFilters) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.find_all(filters.status).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    /// Cambio de tarifa: solo afecta reservas futuras, las existentes
    /// conservan su snapshot
    pub async fn update_rate(
        &self,
        id: Uuid,
        request: UpdateRateRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        if request.daily_rate <= rust_decimal::Decimal::ZERO {
            return Err(AppError::Validation(
                "dailyRate must be positive".to_string(),
            ));
        }

        let vehicle = self.repository.update_rate(id, request.daily_rate).await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Tarifa actualizada".to_string(),
        ))
    }

    /// Retiro o borrado según historial: con reservas que lo referencien
    /// el vehículo se retira (soft); sin historial se elimina de verdad.
    pub async fn retire_or_delete(
        &self,
        id: Uuid,
    ) -> Result<ApiResponse<Option<VehicleResponse>>, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let references = self.repository.reservation_references(vehicle.id).await?;
        if references > 0 {
            let retired = self.repository.retire(vehicle.id).await?;
            return Ok(ApiResponse::success_with_message(
                Some(retired.into()),
                format!(
                    "Vehículo retirado (offline): {} reservas lo referencian",
                    references
                ),
            ));
        }

        self.repository.delete(vehicle.id).await?;
        Ok(ApiResponse::success_with_message(
            None,
            "Vehículo eliminado exitosamente".to_string(),
        ))
    }
}
