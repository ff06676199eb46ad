//! Models module
//!
//! Este módulo contiene las entidades del dominio que mapean al schema
//! PostgreSQL: vehículos, reservas, mantenimientos y el agregado de flota.

pub mod fleet;
pub mod maintenance;
pub mod reservation;
pub mod vehicle;

pub use fleet::*;
pub use maintenance::*;
pub use reservation::*;
pub use vehicle::*;
