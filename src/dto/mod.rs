//! DTOs module
//!
//! Tipos de request/response de la API. El dashboard habla camelCase y el
//! schema habla snake_case: ese marshalling vive únicamente aquí, en el
//! borde, nunca en el modelo de dominio.

pub mod fleet_dto;
pub mod maintenance_dto;
pub mod reservation_dto;
pub mod vehicle_dto;

use serde::Serialize;

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}
