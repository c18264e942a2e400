//! Configuración de variables de entorno
//!
//! Carga la configuración del servidor y las credenciales de cada
//! transportista. La lectura se separa del entorno del proceso
//! (`from_lookup`) para que los tests no tengan que modificar variables.

use std::env;
use std::time::Duration;

use crate::utils::errors::{DeliveryError, DeliveryResult};
use crate::utils::validation::DEFAULT_CALLING_CODE;

/// Credenciales y URL base de un transportista
#[derive(Debug, Clone)]
pub struct CarrierSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// `false` registra el transportista pero todas sus operaciones fallan
    /// con `DeliveryError::Unavailable`
    pub available: bool,
}

impl CarrierSettings {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            available: true,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Timeout de cada petición HTTP a un transportista
    pub request_timeout: Duration,
    /// Tiempo máximo que el gestor espera a un transportista en las
    /// operaciones agregadas
    pub carrier_timeout: Duration,
    pub phone_calling_code: String,
    pub speedy: CarrierSettings,
    pub econt: CarrierSettings,
}

impl DeliveryConfig {
    /// Leer la configuración desde las variables de entorno del proceso
    pub fn from_env() -> DeliveryResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> DeliveryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| DeliveryError::Config(format!("{} must be set", key)))
        };
        let number = |key: &str, default: u64| -> DeliveryResult<u64> {
            match optional(key) {
                Some(value) => value
                    .parse()
                    .map_err(|_| DeliveryError::Config(format!("{} must be a valid number", key))),
                None => Ok(default),
            }
        };
        let flag = |key: &str| -> DeliveryResult<bool> {
            match optional(key).map(|v| v.to_lowercase()) {
                None => Ok(true),
                Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => Ok(true),
                Some(v) if matches!(v.as_str(), "false" | "0" | "no") => Ok(false),
                Some(_) => Err(DeliveryError::Config(format!("{} must be true or false", key))),
            }
        };
        let carrier = |prefix: &str| -> DeliveryResult<CarrierSettings> {
            let mut settings = CarrierSettings::new(
                required(&format!("{}_API_URL", prefix))?,
                required(&format!("{}_USERNAME", prefix))?,
                required(&format!("{}_PASSWORD", prefix))?,
            );
            settings.available = flag(&format!("{}_AVAILABLE", prefix))?;
            Ok(settings)
        };

        let port = number("PORT", 3000)?;
        let port = u16::try_from(port)
            .map_err(|_| DeliveryError::Config("PORT must be a valid port number".to_string()))?;

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            request_timeout: Duration::from_secs(number("DELIVERY_REQUEST_TIMEOUT_SECS", 15)?),
            carrier_timeout: Duration::from_secs(number("DELIVERY_CARRIER_TIMEOUT_SECS", 20)?),
            phone_calling_code: optional("DELIVERY_PHONE_COUNTRY_CODE")
                .map(|code| code.trim_start_matches('+').to_string())
                .unwrap_or_else(|| DEFAULT_CALLING_CODE.to_string()),
            speedy: carrier("SPEEDY")?,
            econt: carrier("ECONT")?,
        })
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn base_vars() -> HashMap<String, String> {
        vars(&[
            ("SPEEDY_API_URL", "https://api.speedy.bg/v1/"),
            ("SPEEDY_USERNAME", "speedy-user"),
            ("SPEEDY_PASSWORD", "speedy-pass"),
            ("ECONT_API_URL", "https://ee.econt.com/services"),
            ("ECONT_USERNAME", "econt-user"),
            ("ECONT_PASSWORD", "econt-pass"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let env = base_vars();
        let config = DeliveryConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.phone_calling_code, "359");
        assert_eq!(config.carrier_timeout, Duration::from_secs(20));
        assert_eq!(config.speedy.base_url, "https://api.speedy.bg/v1");
        assert!(config.speedy.available);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let mut env = base_vars();
        env.remove("ECONT_PASSWORD");
        let error = DeliveryConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert_eq!(error.to_string(), "Configuration error: ECONT_PASSWORD must be set");
    }

    #[test]
    fn test_carrier_can_be_marked_unavailable() {
        let mut env = base_vars();
        env.insert("SPEEDY_AVAILABLE".to_string(), "false".to_string());
        env.insert("CORS_ORIGINS".to_string(), "https://shop.example, https://admin.example".to_string());
        let config = DeliveryConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert!(!config.speedy.available);
        assert!(config.econt.available);
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut env = base_vars();
        env.insert("PORT".to_string(), "abc".to_string());
        assert!(DeliveryConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }
}
