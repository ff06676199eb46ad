//! Utilities module

pub mod errors;

pub use errors::AppError;
