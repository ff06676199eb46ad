//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor: pricing puro,
//! disponibilidad, agregación de flota y el lifecycle manager de reservas.

pub mod availability;
pub mod fleet_aggregator;
pub mod pricing;
pub mod reservation_service;

pub use pricing::{price, Quote};
pub use reservation_service::{BookingRequest, ReservationService};
