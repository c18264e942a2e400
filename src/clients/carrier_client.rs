//! Cliente HTTP base para las APIs de transportistas
//!
//! Centraliza lo que no depende del transportista: autenticación, cabeceras
//! JSON, manejo de respuestas y validaciones previas a la llamada de red.
//! Cada adaptador concreto sólo traduce formas de datos.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::environment::CarrierSettings;
use crate::models::delivery::DeliveryAddress;
use crate::utils::errors::{DeliveryError, DeliveryResult};
use crate::utils::validation::{self, missing_address_fields, validate_weight, MAX_WEIGHT_KG};

/// Longitud máxima del cuerpo crudo incluido en un mensaje de error
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Esquema de autenticación esperado por el transportista
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Cabecera `Authorization: Basic`
    Basic,
    /// `userName` / `password` dentro del cuerpo JSON
    BodyCredentials,
}

/// Cliente HTTP autenticado para un transportista
#[derive(Debug, Clone)]
pub struct CarrierClient {
    display_name: &'static str,
    settings: CarrierSettings,
    auth: AuthScheme,
    calling_code: String,
    http: Client,
}

impl CarrierClient {
    pub fn new(
        display_name: &'static str,
        settings: CarrierSettings,
        auth: AuthScheme,
        calling_code: impl Into<String>,
        timeout: std::time::Duration,
    ) -> DeliveryResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Config(format!("{}: cannot build HTTP client: {}", display_name, e)))?;

        Ok(Self {
            display_name,
            settings,
            auth,
            calling_code: calling_code.into(),
            http,
        })
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    pub fn settings(&self) -> &CarrierSettings {
        &self.settings
    }

    /// Falla sin tocar la red si la integración está marcada como no disponible
    pub fn ensure_available(&self) -> DeliveryResult<()> {
        if self.settings.available {
            Ok(())
        } else {
            Err(DeliveryError::Unavailable {
                provider: self.display_name.to_string(),
            })
        }
    }

    /// Ejecutar una petición autenticada y devolver el cuerpo JSON
    pub async fn request(&self, method: Method, endpoint: &str, body: Option<Value>) -> DeliveryResult<Value> {
        self.ensure_available()?;

        let url = format!("{}/{}", self.settings.base_url, endpoint.trim_start_matches('/'));
        log::debug!("📡 {} {} {}", self.display_name, method, url);

        let mut builder = self
            .http
            .request(method, &url)
            .header("Accept", "application/json");

        if self.auth == AuthScheme::Basic {
            builder = builder.basic_auth(&self.settings.username, Some(&self.settings.password));
        }

        let body = match (self.auth, body) {
            (AuthScheme::BodyCredentials, Some(Value::Object(mut map))) => {
                map.insert("userName".to_string(), Value::String(self.settings.username.clone()));
                map.insert("password".to_string(), Value::String(self.settings.password.clone()));
                Some(Value::Object(map))
            }
            (_, body) => body,
        };

        if let Some(body) = body {
            // .json() también fija Content-Type: application/json
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DeliveryError::api(self.display_name, format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DeliveryError::api(self.display_name, format!("cannot read response: {}", e)))?;

        if !status.is_success() {
            let detail = extract_error_message(&text).unwrap_or_else(|| truncate(&text, MAX_ERROR_BODY_CHARS));
            log::error!("❌ {} respondió {}: {}", self.display_name, status, detail);
            return Err(DeliveryError::api(
                self.display_name,
                format!("HTTP {}: {}", status.as_u16(), detail),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            log::error!("❌ {} devolvió JSON inválido: {}", self.display_name, e);
            DeliveryError::invalid_response(self.display_name, e.to_string())
        })
    }

    /// Igual que `request`, deserializando la respuesta al DTO del transportista
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> DeliveryResult<T> {
        let value = self.request(method, endpoint, body).await?;
        serde_json::from_value(value)
            .map_err(|e| DeliveryError::invalid_response(self.display_name, e.to_string()))
    }

    pub fn ensure_address(&self, address: &DeliveryAddress) -> DeliveryResult<()> {
        let missing = missing_address_fields(address);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DeliveryError::validation(format!(
                "address is missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn ensure_weight(&self, weight: f64) -> DeliveryResult<()> {
        validate_weight(weight).map_err(|_| {
            DeliveryError::validation(format!(
                "weight must be greater than 0 and at most {} kg, got {}",
                MAX_WEIGHT_KG, weight
            ))
        })
    }

    pub fn normalize_phone(&self, phone: &str) -> String {
        validation::normalize_phone(phone, &self.calling_code)
    }
}

/// Interpretar las fechas que devuelven los transportistas (RFC 3339, fecha
/// y hora sin zona, o sólo fecha). Las horas sin zona se toman como UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Días naturales entre el envío y la entrega estimada
pub fn delivery_days_between(sent: Option<&str>, delivered: Option<&str>) -> Option<u32> {
    let sent = parse_timestamp(sent?)?.date_naive();
    let delivered = parse_timestamp(delivered?)?.date_naive();
    u32::try_from((delivered - sent).num_days()).ok()
}

/// Buscar un mensaje de error legible en un cuerpo JSON de error
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.get("message"),
        value.get("error").and_then(|e| e.get("message")),
        value.get("error"),
        value.get("Message"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
        .filter(|msg| !msg.trim().is_empty());
    message
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push('…');
        truncated
    }
}
