//! Servicio de ciclo de vida de reservas
//!
//! Dueño único de la máquina de estados de reserva y de los flips de estado
//! del vehículo. El check de disponibilidad y el insert se ejecutan dentro
//! de una misma transacción sosteniendo el lock de la fila del vehículo:
//! dos `create` concurrentes sobre intervalos solapados no pueden tener
//! éxito ambos.

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::events::{ChangeKind, EntityKind, EventBus};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::maintenance_repository;
use crate::repositories::reservation_repository::{self, ReservationRepository};
use crate::repositories::vehicle_repository;
use crate::services::{availability, pricing};
use crate::utils::errors::AppError;

/// Solicitud de reserva ya deserializada y con defaults aplicados
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pickup_location: String,
    /// None -> misma ubicación que la recogida
    pub dropoff_location: Option<String>,
}

pub struct ReservationService {
    pool: PgPool,
    events: EventBus,
    lock_timeout_ms: u64,
}

impl ReservationService {
    pub fn new(pool: PgPool, events: EventBus, lock_timeout_ms: u64) -> Self {
        Self {
            pool,
            events,
            lock_timeout_ms,
        }
    }

    /// Probe informativo de disponibilidad (sin lock). La respuesta puede
    /// quedar obsoleta en cuanto se emite; la verificación autoritativa
    /// vive en `create` y en la confirmación.
    pub async fn check_availability(
        &self,
        vehicle_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, AppError> {
        if start >= end {
            return Err(AppError::Validation(format!(
                "Invalid date range: {} to {}",
                start, end
            )));
        }

        let repo = ReservationRepository::new(self.pool.clone());
        let blocking = repo.find_blocking_for_vehicle(vehicle_id).await?;
        Ok(availability::is_interval_free(&blocking, start, end, None))
    }

    /// Crear una reserva en estado pending.
    ///
    /// Valida entrada, bloquea la fila del vehículo, re-lee el conjunto
    /// bloqueante bajo el lock, calcula el precio con la tarifa vigente
    /// (que queda congelada en la reserva) e inserta. Emite un único
    /// evento `created` tras el commit.
    pub async fn create(&self, request: BookingRequest) -> Result<Reservation, AppError> {
        validate_contacts(&request)?;

        let mut tx = self.pool.begin().await?;
        reservation_repository::set_lock_timeout(&mut tx, self.lock_timeout_ms)
            .await
            .map_err(map_lock_err)?;

        let vehicle = vehicle_repository::lock_vehicle(&mut tx, request.vehicle_id)
            .await
            .map_err(map_lock_err)?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if vehicle.status == VehicleStatus::Offline {
            return Err(AppError::Conflict(
                "Vehicle is retired and no longer accepts reservations".to_string(),
            ));
        }

        let blocking = reservation_repository::find_blocking_tx(&mut tx, request.vehicle_id)
            .await
            .map_err(map_lock_err)?;

        if !availability::is_interval_free(&blocking, request.start_date, request.end_date, None) {
            return Err(AppError::Conflict(format!(
                "Vehicle {} is not available from {} to {}",
                vehicle.license_plate, request.start_date, request.end_date
            )));
        }

        // Snapshot de la tarifa: cambios posteriores no tocan esta reserva
        let quote = pricing::price(vehicle.daily_rate, request.start_date, request.end_date)?;

        let dropoff = request
            .dropoff_location
            .unwrap_or_else(|| request.pickup_location.clone());

        let reservation = reservation_repository::insert_pending_tx(
            &mut tx,
            request.vehicle_id,
            request.customer_name,
            request.customer_email,
            request.customer_phone,
            request.start_date,
            request.end_date,
            quote.total_days,
            vehicle.daily_rate,
            quote.total_amount,
            quote.deposit_amount,
            request.pickup_location,
            dropoff,
        )
        .await
        .map_err(map_lock_err)?;

        tx.commit().await?;

        info!(
            "📝 Reserva {} creada para vehículo {} ({} - {})",
            reservation.id, reservation.vehicle_id, reservation.start_date, reservation.end_date
        );
        self.emit(ChangeKind::Created, &reservation);

        Ok(reservation)
    }

    /// Transicionar una reserva a `target` según la tabla del ciclo de vida.
    ///
    /// Al entrar a `confirmed` se re-verifica disponibilidad (otra reserva
    /// pudo confirmarse sobre el mismo intervalo desde que esta quedó
    /// pending). Si la re-verificación falla la reserva queda en pending
    /// para resolución manual, no se auto-cancela.
    pub async fn transition(
        &self,
        id: Uuid,
        target: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;
        reservation_repository::set_lock_timeout(&mut tx, self.lock_timeout_ms)
            .await
            .map_err(map_lock_err)?;

        let current = reservation_repository::lock_reservation_tx(&mut tx, id)
            .await
            .map_err(map_lock_err)?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        let updated = self.apply_transition(&mut tx, current, target).await?;
        tx.commit().await?;

        self.emit(ChangeKind::Updated, &updated);
        Ok(updated)
    }

    /// Cancelar desde cualquier estado no terminal. Idempotente: cancelar
    /// una reserva ya cancelada es éxito sin efecto (y sin evento).
    pub async fn cancel(&self, id: Uuid, reason: Option<String>) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;
        reservation_repository::set_lock_timeout(&mut tx, self.lock_timeout_ms)
            .await
            .map_err(map_lock_err)?;

        let current = reservation_repository::lock_reservation_tx(&mut tx, id)
            .await
            .map_err(map_lock_err)?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        if current.status == ReservationStatus::Cancelled {
            return Ok(current);
        }

        let updated = self
            .apply_transition(&mut tx, current, ReservationStatus::Cancelled)
            .await?;
        tx.commit().await?;

        info!(
            "🚫 Reserva {} cancelada{}",
            updated.id,
            reason
                .map(|r| format!(" (motivo: {})", r))
                .unwrap_or_default()
        );
        self.emit(ChangeKind::Updated, &updated);
        Ok(updated)
    }

    /// Aplicar una transición validada dentro de la transacción abierta,
    /// incluyendo los efectos colaterales sobre el estado del vehículo.
    async fn apply_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        current: Reservation,
        target: ReservationStatus,
    ) -> Result<Reservation, AppError> {
        if !current.status.can_transition_to(target) {
            return Err(AppError::invalid_transition(
                current.status.as_str(),
                target.as_str(),
            ));
        }

        if target == ReservationStatus::Confirmed {
            // Re-verificación bajo el lock del vehículo: una reserva
            // concurrente pudo confirmarse sobre el mismo intervalo
            vehicle_repository::lock_vehicle(tx, current.vehicle_id)
                .await
                .map_err(map_lock_err)?
                .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

            let blocking = reservation_repository::find_blocking_tx(tx, current.vehicle_id)
                .await
                .map_err(map_lock_err)?;

            if !availability::is_interval_free(
                &blocking,
                current.start_date,
                current.end_date,
                Some(current.id),
            ) {
                return Err(AppError::Conflict(format!(
                    "Interval {} - {} was confirmed for another reservation; this one stays pending",
                    current.start_date, current.end_date
                )));
            }
        }

        let updated = reservation_repository::update_status_tx(tx, current.id, target)
            .await
            .map_err(map_lock_err)?;

        match target {
            // La recogida ocurrió: el vehículo pasa a in_use
            ReservationStatus::Active => {
                vehicle_repository::set_status_tx(tx, updated.vehicle_id, VehicleStatus::InUse)
                    .await
                    .map_err(map_lock_err)?;
            }
            // Devolución o cancelación: liberar el vehículo solo si esta
            // reserva era quien lo retenía y ninguna otra activa lo toma
            ReservationStatus::Completed | ReservationStatus::Cancelled => {
                self.release_vehicle_if_free(tx, &updated).await?;
            }
            _ => {}
        }

        Ok(updated)
    }

    async fn release_vehicle_if_free(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reservation: &Reservation,
    ) -> Result<(), AppError> {
        let vehicle = vehicle_repository::lock_vehicle(tx, reservation.vehicle_id)
            .await
            .map_err(map_lock_err)?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let other_active = reservation_repository::other_active_exists_tx(
            tx,
            reservation.vehicle_id,
            reservation.id,
        )
        .await
        .map_err(map_lock_err)?;

        // Con un servicio pendiente ya en fecha el vehículo no vuelve a
        // estar disponible: pasa a taller
        let open_due = maintenance_repository::open_due_exists_tx(
            tx,
            reservation.vehicle_id,
            Utc::now().date_naive(),
        )
        .await
        .map_err(map_lock_err)?;

        if let Some(next) = release_outcome(vehicle.status, other_active, open_due) {
            vehicle_repository::set_status_tx(tx, reservation.vehicle_id, next)
                .await
                .map_err(map_lock_err)?;
        }

        Ok(())
    }

    /// Fan-out best-effort: un fallo de serialización se loguea y listo,
    /// el cambio canónico ya fue persistido.
    fn emit(&self, kind: ChangeKind, reservation: &Reservation) {
        match serde_json::to_value(reservation) {
            Ok(record) => self.events.publish(EntityKind::Reservation, kind, record),
            Err(e) => warn!("📡 No se pudo serializar el evento de reserva: {}", e),
        }
    }
}

/// Estado del vehículo tras cerrar una reserva (completed/cancelled).
///
/// Solo se libera un vehículo in_use sin otra reserva activa; si además
/// tiene un mantenimiento pendiente ya en fecha, entra a taller en lugar
/// de quedar disponible.
fn release_outcome(
    current: VehicleStatus,
    other_active: bool,
    open_due_maintenance: bool,
) -> Option<VehicleStatus> {
    if current != VehicleStatus::InUse || other_active {
        return None;
    }
    if open_due_maintenance {
        Some(VehicleStatus::Maintenance)
    } else {
        Some(VehicleStatus::Available)
    }
}

fn validate_contacts(request: &BookingRequest) -> Result<(), AppError> {
    if request.customer_name.trim().is_empty() {
        return Err(AppError::Validation("customer_name is required".to_string()));
    }
    if request.customer_email.trim().is_empty() || !request.customer_email.contains('@') {
        return Err(AppError::Validation(
            "customer_email must be a valid email".to_string(),
        ));
    }
    if request.customer_phone.trim().is_empty() {
        return Err(AppError::Validation("customer_phone is required".to_string()));
    }
    if request.pickup_location.trim().is_empty() {
        return Err(AppError::Validation("pickup_location is required".to_string()));
    }
    if request.start_date >= request.end_date {
        return Err(AppError::Validation(format!(
            "start_date {} must be before end_date {}",
            request.start_date, request.end_date
        )));
    }
    if request.start_date < Utc::now().date_naive() {
        // Regla blanda: solo advertimos, el backoffice puede cargar
        // reservas retroactivas al migrar historial
        warn!(
            "Reserva con start_date pasado: {} (vehículo {})",
            request.start_date, request.vehicle_id
        );
    }
    Ok(())
}

/// Mapear el agotamiento del lock_timeout (55P03) a Busy; el caller puede
/// reintentar con backoff. Cualquier otro error de base se propaga tal cual.
fn map_lock_err(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("55P03") {
            return AppError::Busy("could not acquire vehicle lock in time".to_string());
        }
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookingRequest {
        BookingRequest {
            vehicle_id: Uuid::new_v4(),
            customer_name: "Claire Fontaine".to_string(),
            customer_email: "claire@example.com".to_string(),
            customer_phone: "+33622222222".to_string(),
            start_date: NaiveDate::from_ymd_opt(2030, 5, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 5, 15).unwrap(),
            pickup_location: "Marseille".to_string(),
            dropoff_location: None,
        }
    }

    #[test]
    fn test_validate_contacts_accepts_complete_request() {
        assert!(validate_contacts(&request()).is_ok());
    }

    #[test]
    fn test_validate_contacts_rejects_missing_fields() {
        let mut r = request();
        r.customer_name = "  ".to_string();
        assert!(matches!(
            validate_contacts(&r),
            Err(AppError::Validation(_))
        ));

        let mut r = request();
        r.customer_email = "not-an-email".to_string();
        assert!(matches!(
            validate_contacts(&r),
            Err(AppError::Validation(_))
        ));

        let mut r = request();
        r.customer_phone = String::new();
        assert!(matches!(
            validate_contacts(&r),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_contacts_rejects_inverted_dates() {
        let mut r = request();
        r.end_date = r.start_date;
        assert!(matches!(
            validate_contacts(&r),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_release_frees_vehicle_without_pending_work() {
        assert_eq!(
            release_outcome(VehicleStatus::InUse, false, false),
            Some(VehicleStatus::Available)
        );
    }

    #[test]
    fn test_release_sends_vehicle_to_maintenance_when_service_is_due() {
        // Devolución con servicio pendiente ya en fecha: taller, no disponible
        assert_eq!(
            release_outcome(VehicleStatus::InUse, false, true),
            Some(VehicleStatus::Maintenance)
        );
    }

    #[test]
    fn test_release_keeps_vehicle_in_use_for_other_active_reservation() {
        assert_eq!(release_outcome(VehicleStatus::InUse, true, false), None);
        assert_eq!(release_outcome(VehicleStatus::InUse, true, true), None);
    }

    #[test]
    fn test_release_never_touches_a_vehicle_not_in_use() {
        for status in [
            VehicleStatus::Available,
            VehicleStatus::Maintenance,
            VehicleStatus::Offline,
        ] {
            assert_eq!(release_outcome(status, false, false), None);
            assert_eq!(release_outcome(status, false, true), None);
        }
    }
}
