//! DTOs del API
//!
//! Requests de entrada (con validación declarativa) y la response genérica
//! que envuelve todas las salidas del API.

use serde::Serialize;

pub mod auth_dto;
pub mod booking_dto;
pub mod bus_dto;
pub mod route_dto;

pub use auth_dto::*;
pub use booking_dto::*;
pub use bus_dto::*;
pub use route_dto::*;

// Response genérica
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
