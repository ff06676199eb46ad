//! Repository de mantenimientos
//!
//! Acceso sqlx a la tabla maintenance_schedules. La transición
//! pending -> completed ocurre una sola vez y lleva fecha y costo.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::maintenance::{MaintenanceSchedule, MaintenanceStatus};
use crate::utils::errors::AppError;

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_id: Uuid,
        service_type: String,
        scheduled_date: NaiveDate,
    ) -> Result<MaintenanceSchedule, AppError> {
        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            INSERT INTO maintenance_schedules (id, vehicle_id, service_type, scheduled_date, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(service_type)
        .bind(scheduled_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MaintenanceSchedule>, AppError> {
        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    pub async fn find_by_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<MaintenanceSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE vehicle_id = $1 ORDER BY scheduled_date",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    pub async fn find_all(&self) -> Result<Vec<MaintenanceSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules ORDER BY scheduled_date",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    /// Marcar el servicio como completado, con fecha y costo conocidos.
    /// El WHERE sobre status = 'pending' garantiza que la transición ocurre
    /// una sola vez.
    pub async fn complete(
        &self,
        id: Uuid,
        completed_date: NaiveDate,
        cost: Option<Decimal>,
    ) -> Result<MaintenanceSchedule, AppError> {
        let updated = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            UPDATE maintenance_schedules
            SET status = 'completed', completed_date = $2, cost = $3
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(completed_date)
        .bind(cost)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(schedule) => Ok(schedule),
            None => {
                // Distinguir inexistente de ya-completado
                match self.find_by_id(id).await? {
                    Some(existing) if existing.status == MaintenanceStatus::Completed => Err(
                        AppError::invalid_transition("completed", "completed"),
                    ),
                    Some(_) => Err(AppError::Conflict(
                        "Maintenance schedule could not be completed".to_string(),
                    )),
                    None => Err(AppError::NotFound(
                        "Maintenance schedule not found".to_string(),
                    )),
                }
            }
        }
    }

    /// ¿Queda algún mantenimiento pendiente ya vencido/en fecha para el
    /// vehículo? Decide si al completar un servicio el vehículo vuelve a
    /// estar disponible.
    pub async fn open_due_exists(
        &self,
        vehicle_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM maintenance_schedules
                WHERE vehicle_id = $1 AND status = 'pending' AND scheduled_date <= $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }
}

/// Variante transaccional de `open_due_exists`: la consultan los flips de
/// estado de vehículo dentro de la transacción de una transición de
/// reserva, para no liberar un vehículo que debe quedar en taller.
pub async fn open_due_exists_tx(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: Uuid,
    as_of: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM maintenance_schedules
            WHERE vehicle_id = $1 AND status = 'pending' AND scheduled_date <= $2
        )
        "#,
    )
    .bind(vehicle_id)
    .bind(as_of)
    .fetch_one(&mut **tx)
    .await?;

    Ok(result.0)
}
