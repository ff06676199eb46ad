//! Repository de vehículos
//!
//! Acceso sqlx a la tabla vehicles. Los flips de estado por transición de
//! reserva pasan por las variantes transaccionales; nadie más escribe el
//! campo status directamente.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        brand: String,
        model: String,
        year: i32,
        daily_rate: rust_decimal::Decimal,
        seats: i32,
        transmission: String,
        fuel_type: String,
        license_plate: String,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, brand, model, year, daily_rate, seats, transmission, fuel_type, status, license_plate, utilization_rate, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'available', $9, 0, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(daily_rate)
        .bind(seats)
        .bind(transmission)
        .bind(fuel_type)
        .bind(license_plate)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self, status: Option<VehicleStatus>) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = match status {
            Some(status) => {
                sqlx::query_as::<_, Vehicle>(
                    "SELECT * FROM vehicles WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(vehicles)
    }

    pub async fn license_plate_exists(&self, license_plate: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1)")
                .bind(license_plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update_rate(&self, id: Uuid, daily_rate: rust_decimal::Decimal) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET daily_rate = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(daily_rate)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    pub async fn set_status(&self, id: Uuid, status: VehicleStatus) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle)
    }

    /// Cuántas reservas (de cualquier estado) referencian al vehículo.
    /// Con historial > 0 el vehículo nunca se borra, solo se retira.
    pub async fn reservation_references(&self, id: Uuid) -> Result<i64, AppError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reservations WHERE vehicle_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Retiro suave: status -> offline, el registro se conserva
    pub async fn retire(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.set_status(id, VehicleStatus::Offline).await
    }

    /// Borrado duro, solo válido sin historial de reservas
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Bloquear la fila del vehículo dentro de la transacción (FOR UPDATE).
/// Serializa el check-then-insert de reservas concurrentes sobre el mismo
/// vehículo.
pub async fn lock_vehicle(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Vehicle>, sqlx::Error> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Flip de estado dentro de la transacción de una transición de reserva
pub async fn set_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: VehicleStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE vehicles SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
