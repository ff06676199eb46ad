//! Motor de reservas y disponibilidad de flota
//!
//! Núcleo del dashboard de gestión de flota: decide si un vehículo puede
//! reservarse para un rango de fechas, calcula el precio, mueve las
//! reservas por su ciclo de vida, agrega métricas de flota y propaga los
//! cambios de estado a todos los dashboards conectados.
//!
//! El binario (`main.rs`) monta este motor como servicio HTTP; la librería
//! también puede consumirse directamente desde la aplicación anfitriona.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod events;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use events::{ChangeEvent, ChangeKind, EntityKind, EventBus};
pub use models::{
    FleetSnapshot, MaintenanceSchedule, MaintenanceStatus, Reservation, ReservationStatus,
    Vehicle, VehicleStatus,
};
pub use services::{BookingRequest, ReservationService};
pub use utils::AppError;
