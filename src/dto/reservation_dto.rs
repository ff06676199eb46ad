//! DTOs de reservas

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::services::reservation_service::BookingRequest;

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,

    #[validate(email)]
    pub customer_email: String,

    #[validate(length(min = 6, max = 20))]
    pub customer_phone: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(length(min = 2, max = 200))]
    pub pickup_location: String,

    /// Por defecto, misma ubicación que la recogida
    pub dropoff_location: Option<String>,
}

impl From<CreateReservationRequest> for BookingRequest {
    fn from(req: CreateReservationRequest) -> Self {
        BookingRequest {
            vehicle_id: req.vehicle_id,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            start_date: req.start_date,
            end_date: req.end_date,
            pickup_location: req.pickup_location,
            dropoff_location: req.dropoff_location,
        }
    }
}

/// Request para transicionar el estado de una reserva
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReservationRequest {
    pub target_status: ReservationStatus,
}

/// Request para cancelar
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    pub reason: Option<String>,
}

/// Query params del probe de disponibilidad
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
}

/// Filtros para listar reservas
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationFilters {
    pub status: Option<ReservationStatus>,
    pub vehicle_id: Option<Uuid>,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
    pub daily_rate: Decimal,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            vehicle_id: r.vehicle_id,
            customer_name: r.customer_name,
            customer_email: r.customer_email,
            customer_phone: r.customer_phone,
            start_date: r.start_date,
            end_date: r.end_date,
            total_days: r.total_days,
            daily_rate: r.daily_rate,
            total_amount: r.total_amount,
            deposit_amount: r.deposit_amount,
            pickup_location: r.pickup_location,
            dropoff_location: r.dropoff_location,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
