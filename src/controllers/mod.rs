//! Controllers module

pub mod fleet_controller;
pub mod maintenance_controller;
pub mod reservation_controller;
pub mod vehicle_controller;
