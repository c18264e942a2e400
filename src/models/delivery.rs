//! Tipos comunes del subsistema de envíos
//!
//! Vocabulario compartido entre el `DeliveryManager` y todos los adaptadores
//! de transportistas. Son valores inmutables que se construyen en cada
//! llamada y viajan como JSON (camelCase) sin pérdida de información.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_not_empty, validate_phone, validate_point, validate_weight};

/// Dirección postal con los datos de contacto del destinatario/remitente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    #[validate(custom = "validate_not_empty")]
    pub first_name: String,
    #[validate(custom = "validate_not_empty")]
    pub last_name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub address1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub zip: String,
    #[validate(custom = "validate_not_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl DeliveryAddress {
    /// Nombre completo tal como lo esperan los transportistas
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Líneas de dirección unidas en una sola cadena
    pub fn street_line(&self) -> String {
        match self.address2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{}, {}", self.address1.trim(), line2),
            _ => self.address1.trim().to_string(),
        }
    }
}

/// Oficina del transportista (punto de recogida / entrega)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOffice {
    /// Identificador propio del transportista, no único entre transportistas
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub provider: String,
}

/// Origen o destino de un envío: dirección de una persona u oficina
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryPoint {
    Address(DeliveryAddress),
    Office {
        #[serde(rename = "officeId")]
        office_id: String,
    },
}

impl DeliveryPoint {
    pub fn office(office_id: impl Into<String>) -> Self {
        DeliveryPoint::Office {
            office_id: office_id.into(),
        }
    }

    pub fn address(&self) -> Option<&DeliveryAddress> {
        match self {
            DeliveryPoint::Address(address) => Some(address),
            DeliveryPoint::Office { .. } => None,
        }
    }

    pub fn office_id(&self) -> Option<&str> {
        match self {
            DeliveryPoint::Office { office_id } => Some(office_id),
            DeliveryPoint::Address(_) => None,
        }
    }
}

/// Dimensiones del paquete en centímetros
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Solicitud de cálculo de precio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCalculationRequest {
    #[validate(custom = "validate_point")]
    pub from: DeliveryPoint,
    #[validate(custom = "validate_point")]
    pub to: DeliveryPoint,
    /// Peso en kilogramos
    #[validate(custom = "validate_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_shipment: Option<bool>,
}

/// Resultado de un cálculo de precio.
///
/// Si `errors` no está vacío, `price` vale 0 y no debe usarse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCalculationResponse {
    pub provider: String,
    pub service_name: String,
    pub price: f64,
    pub currency: String,
    pub delivery_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl DeliveryCalculationResponse {
    /// Respuesta fallida con precio 0 y los errores indicados
    pub fn failed(provider: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            provider: provider.into(),
            service_name: String::new(),
            price: 0.0,
            currency: String::new(),
            delivery_days: 0,
            errors: Some(errors),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// Solicitud de creación de envío
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    #[validate]
    pub sender: DeliveryAddress,
    #[validate(custom = "validate_point")]
    pub recipient: DeliveryPoint,
    #[validate(custom = "validate_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_amount: Option<f64>,
    #[validate(custom = "validate_not_empty")]
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_shipment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ShipmentRequest {
    pub fn pack_count(&self) -> u32 {
        self.pack_count.filter(|count| *count > 0).unwrap_or(1)
    }
}

/// Resultado de la creación de un envío
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub provider: String,
    pub shipment_id: String,
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_date: Option<String>,
    pub price: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ShipmentResponse {
    pub fn failed(provider: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            provider: provider.into(),
            shipment_id: String::new(),
            tracking_number: String::new(),
            label_url: None,
            estimated_delivery_date: None,
            price: 0.0,
            currency: String::new(),
            errors: Some(errors),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}

/// Estado normalizado de un envío
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Pending,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 5] = [
        TrackingStatus::Pending,
        TrackingStatus::InTransit,
        TrackingStatus::Delivered,
        TrackingStatus::Returned,
        TrackingStatus::Cancelled,
    ];

    /// Busca un código en una tabla de estados; los códigos desconocidos
    /// quedan como `InTransit`.
    pub fn from_table(table: &[(&str, TrackingStatus)], code: &str) -> TrackingStatus {
        let code = code.trim();
        table
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, status)| *status)
            .unwrap_or(TrackingStatus::InTransit)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackingStatus::Delivered | TrackingStatus::Returned | TrackingStatus::Cancelled
        )
    }
}

/// Evento de seguimiento tal como lo reporta el transportista
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub timestamp: DateTime<Utc>,
    /// Código de estado propio del transportista
    pub status: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Información de seguimiento; `events` va del más reciente al más antiguo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub provider: String,
    pub tracking_number: String,
    pub status: TrackingStatus,
    pub status_description: String,
    pub last_update: DateTime<Utc>,
    pub events: Vec<TrackingEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
}

impl TrackingInfo {
    pub fn latest_event(&self) -> Option<&TrackingEvent> {
        self.events.first()
    }
}
