//! Controller de reservas
//!
//! Orquestación entre rutas y el lifecycle manager: validar el DTO,
//! invocar el servicio y mapear a responses de API.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::reservation_dto::{
    AvailabilityQuery, AvailabilityResponse, CancelReservationRequest, CreateReservationRequest,
    ReservationFilters, ReservationResponse, TransitionReservationRequest,
};
use crate::dto::ApiResponse;
use crate::events::EventBus;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::reservation_service::ReservationService;
use crate::utils::errors::AppError;

pub struct ReservationController {
    service: ReservationService,
    repository: ReservationRepository,
}

impl ReservationController {
    pub fn new(pool: PgPool, events: EventBus, lock_timeout_ms: u64) -> Self {
        Self {
            service: ReservationService::new(pool.clone(), events, lock_timeout_ms),
            repository: ReservationRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let reservation = self.service.create(request.into()).await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Reserva creada en estado pending".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReservationResponse, AppError> {
        let reservation = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        Ok(reservation.into())
    }

    pub async fn list(
        &self,
        filters: ReservationFilters,
    ) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = match filters.vehicle_id {
            Some(vehicle_id) => {
                let all = self.repository.find_by_vehicle(vehicle_id).await?;
                match filters.status {
                    Some(status) => all.into_iter().filter(|r| r.status == status).collect(),
                    None => all,
                }
            }
            None => self.repository.find_all(filters.status).await?,
        };

        Ok(reservations.into_iter().map(Into::into).collect())
    }

    pub async fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let available = self
            .service
            .check_availability(query.vehicle_id, query.start_date, query.end_date)
            .await?;

        Ok(AvailabilityResponse {
            vehicle_id: query.vehicle_id,
            start_date: query.start_date,
            end_date: query.end_date,
            available,
        })
    }

    pub async fn transition(
        &self,
        id: Uuid,
        request: TransitionReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.service.transition(id, request.target_status).await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            format!("Reserva transicionada a {}", request.target_status.as_str()),
        ))
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        request: CancelReservationRequest,
    ) -> Result<ApiResponse<ReservationResponse>, AppError> {
        let reservation = self.service.cancel(id, request.reason).await?;

        Ok(ApiResponse::success_with_message(
            reservation.into(),
            "Reserva cancelada".to_string(),
        ))
    }
}
