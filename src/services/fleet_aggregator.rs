//! Servicio de agregación de flota
//!
//! Deriva las métricas de flota (FleetSnapshot) escaneando las colecciones
//! de vehículos, reservas y mantenimientos. `as_of` es siempre un parámetro
//! explícito: nada aquí lee el reloj, el cálculo es determinista y testeable.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::fleet::{FleetSnapshot, MaintenanceAlert};
use crate::models::maintenance::{MaintenanceSchedule, MaintenanceStatus};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};

/// Máximo de alertas urgentes expuestas en el dashboard
pub const MAX_URGENT_ALERTS: usize = 5;

/// Horizonte por defecto para alertas de mantenimiento (días)
pub const DEFAULT_ALERT_HORIZON_DAYS: i64 = 7;

/// Calcular la foto instantánea de la flota al momento `as_of`
pub fn snapshot(
    vehicles: &[Vehicle],
    reservations: &[Reservation],
    schedules: &[MaintenanceSchedule],
    as_of: NaiveDate,
) -> FleetSnapshot {
    let total_vehicles = vehicles.len() as i64;
    let mut available = 0i64;
    let mut in_use = 0i64;
    let mut maintenance = 0i64;
    let mut offline = 0i64;

    for vehicle in vehicles {
        match vehicle.status {
            VehicleStatus::Available => available += 1,
            VehicleStatus::InUse => in_use += 1,
            VehicleStatus::Maintenance => maintenance += 1,
            VehicleStatus::Offline => offline += 1,
        }
    }

    // 0 cuando la flota está vacía, nunca división por cero
    let utilization_rate = if total_vehicles == 0 {
        0
    } else {
        (in_use as f64 / total_vehicles as f64 * 100.0).round() as i64
    };

    let active_reservations = reservations
        .iter()
        .filter(|r| r.status.blocks_availability())
        .count() as i64;

    // Solo las reservas completadas son ingreso realizado;
    // pending/confirmed/active son pipeline, no ingreso
    let total_revenue: Decimal = reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Completed)
        .map(|r| r.total_amount)
        .sum();

    let pending_maintenance = schedules
        .iter()
        .filter(|s| s.status == MaintenanceStatus::Pending)
        .count() as i64;

    let overdue_maintenance = schedules.iter().filter(|s| s.is_overdue(as_of)).count() as i64;

    FleetSnapshot {
        as_of,
        total_vehicles,
        available_vehicles: available,
        in_use_vehicles: in_use,
        maintenance_vehicles: maintenance,
        offline_vehicles: offline,
        utilization_rate,
        active_reservations,
        pending_maintenance,
        overdue_maintenance,
        total_revenue,
    }
}

/// Alertas de mantenimiento urgente: pendientes cuya fecha programada cae
/// dentro del horizonte (incluye las ya vencidas), ascendente por fecha,
/// cortadas al top-N. Es una política simple de priorización, no un
/// planificador.
pub fn urgent_maintenance_alerts(
    schedules: &[MaintenanceSchedule],
    as_of: NaiveDate,
    horizon_days: i64,
) -> Vec<MaintenanceAlert> {
    let mut urgent: Vec<&MaintenanceSchedule> = schedules
        .iter()
        .filter(|s| s.status == MaintenanceStatus::Pending)
        .filter(|s| (s.scheduled_date - as_of).num_days() <= horizon_days)
        .collect();

    urgent.sort_by_key(|s| s.scheduled_date);

    urgent
        .into_iter()
        .take(MAX_URGENT_ALERTS)
        .map(|s| MaintenanceAlert {
            schedule_id: s.id,
            vehicle_id: s.vehicle_id,
            service_type: s.service_type.clone(),
            scheduled_date: s.scheduled_date,
            days_until_due: (s.scheduled_date - as_of).num_days(),
            overdue: s.is_overdue(as_of),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vehicle(status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            brand: "Renault".to_string(),
            model: "Kangoo".to_string(),
            year: 2022,
            daily_rate: Decimal::from(80),
            seats: 2,
            transmission: "manual".to_string(),
            fuel_type: "diesel".to_string(),
            status,
            license_plate: "AB-123-CD".to_string(),
            next_maintenance_date: None,
            utilization_rate: 0,
            created_at: Utc::now(),
        }
    }

    fn reservation(status: ReservationStatus, total_amount: Decimal) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            customer_name: "Jean Martin".to_string(),
            customer_email: "jean@example.com".to_string(),
            customer_phone: "+33611111111".to_string(),
            start_date: date(2025, 2, 1),
            end_date: date(2025, 2, 5),
            total_days: 4,
            daily_rate: Decimal::from(100),
            total_amount,
            deposit_amount: Decimal::ZERO,
            pickup_location: "Lyon".to_string(),
            dropoff_location: "Lyon".to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn schedule(scheduled: NaiveDate, status: MaintenanceStatus) -> MaintenanceSchedule {
        MaintenanceSchedule {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            service_type: "brake_inspection".to_string(),
            scheduled_date: scheduled,
            completed_date: None,
            status,
            cost: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_utilization_math() {
        // 10 vehículos, 4 in_use -> 40%
        let mut vehicles: Vec<Vehicle> =
            (0..4).map(|_| vehicle(VehicleStatus::InUse)).collect();
        vehicles.extend((0..6).map(|_| vehicle(VehicleStatus::Available)));

        let snap = snapshot(&vehicles, &[], &[], date(2025, 3, 1));
        assert_eq!(snap.total_vehicles, 10);
        assert_eq!(snap.in_use_vehicles, 4);
        assert_eq!(snap.utilization_rate, 40);
    }

    #[test]
    fn test_empty_fleet_has_zero_utilization() {
        let snap = snapshot(&[], &[], &[], date(2025, 3, 1));
        assert_eq!(snap.total_vehicles, 0);
        assert_eq!(snap.utilization_rate, 0);
        assert_eq!(snap.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_revenue_counts_only_completed() {
        let reservations = vec![
            reservation(ReservationStatus::Confirmed, Decimal::from(3000)),
            reservation(ReservationStatus::Active, Decimal::from(1200)),
            reservation(ReservationStatus::Pending, Decimal::from(800)),
            reservation(ReservationStatus::Completed, Decimal::from(500)),
            reservation(ReservationStatus::Completed, Decimal::from(700)),
            reservation(ReservationStatus::Cancelled, Decimal::from(999)),
        ];
        let snap = snapshot(&[], &reservations, &[], date(2025, 3, 1));
        assert_eq!(snap.total_revenue, Decimal::from(1200));
        // confirmed + active cuentan como reservas activas
        assert_eq!(snap.active_reservations, 2);
    }

    #[test]
    fn test_maintenance_counts() {
        let as_of = date(2025, 3, 15);
        let schedules = vec![
            schedule(date(2025, 3, 10), MaintenanceStatus::Pending), // vencida
            schedule(date(2025, 3, 20), MaintenanceStatus::Pending),
            schedule(date(2025, 3, 1), MaintenanceStatus::Completed),
        ];
        let snap = snapshot(&[], &[], &schedules, as_of);
        assert_eq!(snap.pending_maintenance, 2);
        assert_eq!(snap.overdue_maintenance, 1);
    }

    #[test]
    fn test_urgent_alerts_sorted_and_capped() {
        let as_of = date(2025, 3, 15);
        let mut schedules = vec![
            schedule(date(2025, 3, 18), MaintenanceStatus::Pending),
            schedule(date(2025, 3, 12), MaintenanceStatus::Pending), // vencida
            schedule(date(2025, 3, 16), MaintenanceStatus::Pending),
            schedule(date(2025, 3, 30), MaintenanceStatus::Pending), // fuera de horizonte
            schedule(date(2025, 3, 17), MaintenanceStatus::Completed),
        ];
        // Rellenar más allá del tope
        for day in 19..23 {
            schedules.push(schedule(date(2025, 3, day), MaintenanceStatus::Pending));
        }

        let alerts = urgent_maintenance_alerts(&schedules, as_of, DEFAULT_ALERT_HORIZON_DAYS);
        assert_eq!(alerts.len(), MAX_URGENT_ALERTS);
        // Ascendente por fecha, la vencida primero
        assert_eq!(alerts[0].scheduled_date, date(2025, 3, 12));
        assert!(alerts[0].overdue);
        assert_eq!(alerts[0].days_until_due, -3);
        for pair in alerts.windows(2) {
            assert!(pair[0].scheduled_date <= pair[1].scheduled_date);
        }
        // Las completadas y las fuera de horizonte no aparecen
        assert!(alerts.iter().all(|a| a.scheduled_date != date(2025, 3, 17)));
        assert!(alerts.iter().all(|a| a.scheduled_date != date(2025, 3, 30)));
    }
}
