//! Repositories module
//!
//! Capa de acceso a datos: un repository por tabla del schema.

pub mod maintenance_repository;
pub mod reservation_repository;
pub mod vehicle_repository;

pub use maintenance_repository::MaintenanceRepository;
pub use reservation_repository::ReservationRepository;
pub use vehicle_repository::VehicleRepository;
