//! Sistema de manejo de errores
//!
//! `DeliveryError` cubre los fallos de los adaptadores de transportistas y
//! `AppError` su conversión a respuestas HTTP.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores de los adaptadores y del gestor de envíos
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Datos del llamador inválidos, detectados antes de cualquier llamada de red
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fallo de transporte o HTTP no-2xx reportado por el transportista
    #[error("{provider} API Error: {message}")]
    Api { provider: String, message: String },

    #[error("{provider} API Error: invalid response: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider} integration is currently unavailable")]
    Unavailable { provider: String },

    #[error("{provider} did not respond within {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Unknown delivery provider: {0}")]
    UnknownProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeliveryError {
    pub fn validation(message: impl Into<String>) -> Self {
        DeliveryError::Validation(message.into())
    }

    pub fn api(provider: &str, message: impl Into<String>) -> Self {
        DeliveryError::Api {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: &str, message: impl Into<String>) -> Self {
        DeliveryError::InvalidResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Resultado tipado para operaciones de envío
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<DeliveryError> for AppError {
    fn from(error: DeliveryError) -> Self {
        let message = error.to_string();
        match error {
            DeliveryError::Validation(_) => AppError::BadRequest(message),
            DeliveryError::UnknownProvider(_) => AppError::NotFound(message),
            DeliveryError::Unavailable { .. } => AppError::ServiceUnavailable(message),
            DeliveryError::Timeout { .. } => AppError::GatewayTimeout(message),
            DeliveryError::Api { .. } | DeliveryError::InvalidResponse { .. } => {
                AppError::ExternalApi(message)
            }
            DeliveryError::Config(_) => AppError::Internal(message),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                log::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: "VALIDATION_ERROR".to_string(),
                    },
                )
            }

            AppError::NotFound(msg) => {
                log::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: "NOT_FOUND".to_string(),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                log::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: "BAD_REQUEST".to_string(),
                    },
                )
            }

            AppError::ServiceUnavailable(msg) => {
                log::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        error: "Service Unavailable".to_string(),
                        message: msg,
                        details: None,
                        code: "SERVICE_UNAVAILABLE".to_string(),
                    },
                )
            }

            AppError::GatewayTimeout(msg) => {
                log::error!("Gateway timeout: {}", msg);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorResponse {
                        error: "Gateway Timeout".to_string(),
                        message: msg,
                        details: None,
                        code: "CARRIER_TIMEOUT".to_string(),
                    },
                )
            }

            AppError::ExternalApi(msg) => {
                log::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: "An error occurred while communicating with the carrier".to_string(),
                        details: Some(json!({ "external_api_error": msg })),
                        code: "EXTERNAL_API_ERROR".to_string(),
                    },
                )
            }

            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: "INTERNAL_ERROR".to_string(),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para los handlers HTTP
pub type AppResult<T> = Result<T, AppError>;
