use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_not_empty;

// Response genérica
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
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

    /// Sin resultado: ningún transportista devolvió una opción válida
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

// Query de oficinas por ciudad
#[derive(Debug, Default, Deserialize)]
pub struct OfficesQuery {
    pub city: Option<String>,
}

// Query de búsqueda de oficinas
#[derive(Debug, Deserialize, Validate)]
pub struct OfficeSearchQuery {
    #[validate(custom = "validate_not_empty")]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub provider: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelShipmentResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabelResponse {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub providers: Vec<String>,
}
