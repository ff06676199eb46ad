//! Events module
//!
//! Fan-out de cambios de estado a los dashboards conectados.

pub mod bus;

pub use bus::{apply_change, ChangeEvent, ChangeKind, EntityKind, EventBus};
