//! Modelo de Reservation
//!
//! Este módulo contiene el struct Reservation, el ENUM de estado y la
//! tabla de transiciones del ciclo de vida. Las reservas nunca se borran:
//! los estados terminales (completed/cancelled) se conservan como historial.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM reservation_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "active" => Some(ReservationStatus::Active),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Estados terminales: no hay transiciones de salida
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// Solo las reservas comprometidas bloquean disponibilidad.
    /// Las `pending` son retenciones provisionales, no compromisos.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed | ReservationStatus::Active)
    }

    /// Tabla de transiciones del ciclo de vida:
    ///
    /// ```text
    /// pending   -> confirmed | cancelled
    /// confirmed -> active    | cancelled
    /// active    -> completed | cancelled
    /// ```
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Active)
                | (Confirmed, Cancelled)
                | (Active, Completed)
                | (Active, Cancelled)
        )
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations.
///
/// `daily_rate` es un snapshot de la tarifa del vehículo al momento de la
/// reserva; cambios posteriores de tarifa no alteran reservas existentes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
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

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 5] = [Pending, Confirmed, Active, Completed, Cancelled];

    #[test]
    fn test_state_machine_closure() {
        // Toda transición fuera de la tabla debe rechazarse
        let allowed = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, Active),
            (Confirmed, Cancelled),
            (Active, Completed),
            (Active, Cancelled),
        ];
        for from in ALL {
            for to in ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_no_exit_from_terminal_states() {
        for from in [Completed, Cancelled] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_pending_does_not_block_availability() {
        assert!(!Pending.blocks_availability());
        assert!(Confirmed.blocks_availability());
        assert!(Active.blocks_availability());
        assert!(!Completed.blocks_availability());
        assert!(!Cancelled.blocks_availability());
    }
}
