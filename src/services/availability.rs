//! Servicio de disponibilidad
//!
//! Lógica pura de solapamiento de intervalos de reserva. Los intervalos son
//! semiabiertos `[start, end)`: una devolución el día X y una recogida el
//! mismo día X sobre el mismo vehículo no entran en conflicto.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::reservation::Reservation;

/// Test de solapamiento de intervalos semiabiertos:
/// `[a_start, a_end)` y `[b_start, b_end)` se solapan sii
/// `a_start < b_end && a_end > b_start`.
pub fn overlaps(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start < b_end && a_end > b_start
}

/// Buscar dentro del conjunto de reservas las que bloquean el intervalo
/// solicitado. Solo `confirmed`/`active` bloquean; las `pending` son
/// retenciones provisionales y no cierran la disponibilidad a otros
/// clientes (regla de negocio deliberada).
///
/// `exclude` permite omitir la propia reserva al re-verificar una
/// confirmación.
pub fn find_conflicts<'a>(
    reservations: &'a [Reservation],
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<Uuid>,
) -> Vec<&'a Reservation> {
    reservations
        .iter()
        .filter(|r| Some(r.id) != exclude)
        .filter(|r| r.status.blocks_availability())
        .filter(|r| overlaps(start, end, r.start_date, r.end_date))
        .collect()
}

/// El vehículo está disponible sii ningún intervalo existente se solapa
pub fn is_interval_free(
    reservations: &[Reservation],
    start: NaiveDate,
    end: NaiveDate,
    exclude: Option<Uuid>,
) -> bool {
    find_conflicts(reservations, start, end, exclude).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reservation::ReservationStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reservation(start: NaiveDate, end: NaiveDate, status: ReservationStatus) -> Reservation {
        let days = (end - start).num_days();
        let rate = Decimal::from(100);
        Reservation {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            customer_name: "Marie Dupont".to_string(),
            customer_email: "marie@example.com".to_string(),
            customer_phone: "+33600000000".to_string(),
            start_date: start,
            end_date: end,
            total_days: days,
            daily_rate: rate,
            total_amount: rate * Decimal::from(days),
            deposit_amount: rate * Decimal::from(days) * Decimal::from_str_exact("0.30").unwrap(),
            pickup_location: "Paris".to_string(),
            dropoff_location: "Paris".to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_half_open_overlap() {
        // Solapamiento parcial
        assert!(overlaps(
            date(2025, 1, 12),
            date(2025, 1, 18),
            date(2025, 1, 10),
            date(2025, 1, 15)
        ));
        // Contención total
        assert!(overlaps(
            date(2025, 1, 11),
            date(2025, 1, 12),
            date(2025, 1, 10),
            date(2025, 1, 15)
        ));
        // Disjuntos
        assert!(!overlaps(
            date(2025, 2, 1),
            date(2025, 2, 5),
            date(2025, 1, 10),
            date(2025, 1, 15)
        ));
    }

    #[test]
    fn test_boundary_adjacency_does_not_conflict() {
        // Devolución el día 15, recogida el día 15: sin conflicto
        assert!(!overlaps(
            date(2025, 1, 15),
            date(2025, 1, 20),
            date(2025, 1, 10),
            date(2025, 1, 15)
        ));
        let existing = vec![reservation(
            date(2025, 1, 10),
            date(2025, 1, 15),
            ReservationStatus::Confirmed,
        )];
        assert!(is_interval_free(
            &existing,
            date(2025, 1, 15),
            date(2025, 1, 20),
            None
        ));
    }

    #[test]
    fn test_confirmed_overlap_blocks() {
        let existing = vec![reservation(
            date(2025, 1, 10),
            date(2025, 1, 15),
            ReservationStatus::Confirmed,
        )];
        assert!(!is_interval_free(
            &existing,
            date(2025, 1, 12),
            date(2025, 1, 18),
            None
        ));
    }

    #[test]
    fn test_pending_does_not_block() {
        let existing = vec![
            reservation(date(2025, 1, 10), date(2025, 1, 15), ReservationStatus::Pending),
            reservation(date(2025, 1, 10), date(2025, 1, 15), ReservationStatus::Cancelled),
            reservation(date(2025, 1, 10), date(2025, 1, 15), ReservationStatus::Completed),
        ];
        assert!(is_interval_free(
            &existing,
            date(2025, 1, 12),
            date(2025, 1, 18),
            None
        ));
    }

    #[test]
    fn test_exclude_self_on_recheck() {
        let mine = reservation(date(2025, 1, 10), date(2025, 1, 15), ReservationStatus::Confirmed);
        let id = mine.id;
        let existing = vec![mine];
        // Sin exclusión la propia reserva aparece como conflicto
        assert!(!is_interval_free(&existing, date(2025, 1, 10), date(2025, 1, 15), None));
        assert!(is_interval_free(&existing, date(2025, 1, 10), date(2025, 1, 15), Some(id)));
    }
}
