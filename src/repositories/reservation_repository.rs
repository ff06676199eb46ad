//! Repository de reservas
//!
//! Acceso sqlx a la tabla reservations. Las reservas nunca se borran;
//! las escrituras de estado llegan únicamente desde el lifecycle manager,
//! dentro de su transacción.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::utils::errors::AppError;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reservation)
    }

    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE vehicle_id = $1 ORDER BY start_date",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    pub async fn find_all(
        &self,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = match status {
            Some(status) => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(reservations)
    }

    /// Reservas que bloquean disponibilidad del vehículo (confirmed/active).
    /// Lectura fuera de transacción, solo para el probe informativo: la
    /// verificación autoritativa se hace con `find_blocking_tx` bajo lock.
    pub async fn find_blocking_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE vehicle_id = $1 AND status IN ('confirmed', 'active')
            ORDER BY start_date
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

}

/// ¿Existe otra reserva activa sobre el vehículo? Decide si una transición
/// de salida libera el vehículo o lo deja in_use.
pub async fn other_active_exists_tx(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: Uuid,
    exclude: Uuid,
) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM reservations
            WHERE vehicle_id = $1 AND status = 'active' AND id <> $2
        )
        "#,
    )
    .bind(vehicle_id)
    .bind(exclude)
    .fetch_one(&mut **tx)
    .await?;

    Ok(result.0)
}

/// Conjunto bloqueante leído dentro de la transacción que ya sostiene el
/// lock del vehículo - esta es la lectura autoritativa del check-then-book.
pub async fn find_blocking_tx(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: Uuid,
) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT * FROM reservations
        WHERE vehicle_id = $1 AND status IN ('confirmed', 'active')
        ORDER BY start_date
        "#,
    )
    .bind(vehicle_id)
    .fetch_all(&mut **tx)
    .await
}

/// Insertar la reserva en estado pending dentro de la transacción
#[allow(clippy::too_many_arguments)]
pub async fn insert_pending_tx(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_days: i64,
    daily_rate: Decimal,
    total_amount: Decimal,
    deposit_amount: Decimal,
    pickup_location: String,
    dropoff_location: String,
) -> Result<Reservation, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (
            id, vehicle_id, customer_name, customer_email, customer_phone,
            start_date, end_date, total_days, daily_rate, total_amount,
            deposit_amount, pickup_location, dropoff_location, status,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(vehicle_id)
    .bind(customer_name)
    .bind(customer_email)
    .bind(customer_phone)
    .bind(start_date)
    .bind(end_date)
    .bind(total_days)
    .bind(daily_rate)
    .bind(total_amount)
    .bind(deposit_amount)
    .bind(pickup_location)
    .bind(dropoff_location)
    .fetch_one(&mut **tx)
    .await
}

/// Bloquear la fila de la reserva para una transición de estado
pub async fn lock_reservation_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Actualizar el estado dentro de la transacción de la transición
pub async fn update_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: ReservationStatus,
) -> Result<Reservation, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
}

/// Acotar la espera de locks de esta transacción. Superado el límite,
/// Postgres corta con 55P03 y la operación se reporta como Busy.
pub async fn set_lock_timeout(
    tx: &mut Transaction<'_, Postgres>,
    millis: u64,
) -> Result<(), sqlx::Error> {
    // SET LOCAL no acepta parámetros bind
    sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", millis))
        .execute(&mut **tx)
        .await?;

    Ok(())
}
