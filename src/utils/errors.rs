//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del motor de reservas
//! y su conversión a respuestas HTTP apropiadas. Cada clase de error del
//! dominio produce un código distinto: el conflicto de reserva es un caso
//! frecuente y debe distinguirse de un error de validación.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Entrada malformada: rango de fechas no positivo, campos de contacto
    /// faltantes. El caller corrige y reintenta manualmente.
    #[error("Validation error: {0}")]
    Validation(String),

    /// El intervalo solicitado ya no está disponible (se perdió la carrera
    /// o falló la re-verificación al confirmar). No se reintenta: el mismo
    /// intervalo volverá a fallar.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transición de estado no permitida desde el estado actual.
    /// Indica un bug del caller (estado desactualizado en la UI).
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Contención transitoria adquiriendo el lock transaccional.
    /// El caller puede reintentar con backoff exponencial acotado.
    #[error("Busy: {0}")]
    Busy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn invalid_transition(from: &str, to: &str) -> Self {
        AppError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Solo Busy es candidata a reintento automático
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Busy(_))
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                warn!("Booking conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: Some(json!({
                            "hint": "The requested dates are no longer available, please choose another range"
                        })),
                        code: Some("RESERVATION_CONFLICT".to_string()),
                    },
                )
            }

            AppError::InvalidTransition { from, to } => {
                warn!("Invalid transition: {} -> {}", from, to);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Invalid Transition".to_string(),
                        message: format!("Cannot transition reservation from '{}' to '{}'", from, to),
                        details: Some(json!({ "from": from, "to": to })),
                        code: Some("INVALID_TRANSITION".to_string()),
                    },
                )
            }

            AppError::Busy(msg) => {
                warn!("Lock contention: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Busy".to_string(),
                        message: "The vehicle is being booked by another request, please retry".to_string(),
                        details: Some(json!({ "reason": msg })),
                        code: Some("RETRY_LATER".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_busy_is_retryable() {
        assert!(AppError::Busy("lock timeout".to_string()).is_retryable());
        assert!(!AppError::Validation("bad dates".to_string()).is_retryable());
        assert!(!AppError::Conflict("overlap".to_string()).is_retryable());
        assert!(!AppError::invalid_transition("pending", "active").is_retryable());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = AppError::invalid_transition("completed", "cancelled");
        assert_eq!(err.to_string(), "Invalid transition: completed -> cancelled");
    }
}
