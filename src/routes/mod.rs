//! Routes module
//!
//! Routers de Axum por entidad, montados bajo /api en main.

pub mod fleet_routes;
pub mod maintenance_routes;
pub mod reservation_routes;
pub mod vehicle_routes;
