//! Utilidades de validación
//!
//! Validaciones comunes a todos los transportistas: campos obligatorios de
//! una dirección, límites de peso y normalización de teléfonos.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::models::delivery::{DeliveryAddress, DeliveryPoint};

/// Peso máximo aceptado por los transportistas (kg)
pub const MAX_WEIGHT_KG: f64 = 100.0;

/// Prefijo telefónico por defecto (Bulgaria)
pub const DEFAULT_CALLING_CODE: &str = "359";

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"\D+").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que el teléfono tenga dígitos suficientes para formato internacional
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if normalize_phone(value, DEFAULT_CALLING_CODE).is_empty() {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Una dirección es válida si nombre, apellido, teléfono, línea 1, ciudad,
/// código postal y país están presentes.
pub fn is_valid_address(address: &DeliveryAddress) -> bool {
    address.validate().is_ok()
}

/// Nombres de los campos obligatorios que faltan en la dirección
pub fn missing_address_fields(address: &DeliveryAddress) -> Vec<String> {
    match address.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            fields
        }
    }
}

/// Un punto de envío es válido si la dirección está completa o la oficina
/// tiene identificador
pub fn validate_point(point: &DeliveryPoint) -> Result<(), ValidationError> {
    match point {
        DeliveryPoint::Office { office_id } if office_id.trim().is_empty() => {
            Err(ValidationError::new("office_id"))
        }
        DeliveryPoint::Office { .. } => Ok(()),
        DeliveryPoint::Address(address) => {
            let missing = missing_address_fields(address);
            if missing.is_empty() {
                return Ok(());
            }
            let mut error = ValidationError::new("address");
            error.add_param("missing".into(), &missing);
            Err(error)
        }
    }
}

/// Validar que el peso esté en (0, 100] kg
pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    if !weight.is_finite() || weight <= 0.0 || weight > MAX_WEIGHT_KG {
        let mut error = ValidationError::new("weight");
        error.add_param("value".into(), &weight);
        error.add_param("max".into(), &MAX_WEIGHT_KG);
        return Err(error);
    }
    Ok(())
}

/// Normalizar un teléfono a formato internacional sólo con dígitos.
///
/// `00` inicial se descarta como prefijo internacional; un `0` inicial
/// (prefijo troncal nacional) se reemplaza por `calling_code`.
pub fn normalize_phone(raw: &str, calling_code: &str) -> String {
    let digits = NON_DIGITS.replace_all(raw, "");
    if let Some(international) = digits.strip_prefix("00") {
        return international.trim_start_matches('0').to_string();
    }
    match digits.strip_prefix('0') {
        Some(national) => format!("{}{}", calling_code, national),
        None => digits.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            first_name: "Maria".to_string(),
            last_name: "Ivanova".to_string(),
            phone: "+359 888 123 456".to_string(),
            email: Some("maria@example.com".to_string()),
            company: None,
            address1: "ul. Rakovski 12".to_string(),
            address2: None,
            city: "Plovdiv".to_string(),
            province: None,
            province_code: None,
            zip: "4000".to_string(),
            country: "Bulgaria".to_string(),
            country_code: Some("BG".to_string()),
        }
    }

    #[test]
    fn test_validate_point() {
        assert!(validate_point(&DeliveryPoint::office("1127")).is_ok());
        assert!(validate_point(&DeliveryPoint::office("  ")).is_err());
        assert!(validate_point(&DeliveryPoint::Address(address())).is_ok());

        let mut incomplete = address();
        incomplete.zip = String::new();
        assert!(validate_point(&DeliveryPoint::Address(incomplete)).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Sofia").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_complete_address_is_valid() {
        assert!(is_valid_address(&address()));
        assert!(missing_address_fields(&address()).is_empty());
    }

    #[test]
    fn test_missing_required_field_rejects_address() {
        let mutations: Vec<(&str, fn(&mut DeliveryAddress))> = vec![
            ("first_name", |a| a.first_name.clear()),
            ("last_name", |a| a.last_name.clear()),
            ("phone", |a| a.phone = "  ".to_string()),
            ("address1", |a| a.address1.clear()),
            ("city", |a| a.city.clear()),
            ("zip", |a| a.zip.clear()),
            ("country", |a| a.country.clear()),
        ];

        for (field, mutate) in mutations {
            let mut incomplete = address();
            mutate(&mut incomplete);
            assert!(!is_valid_address(&incomplete), "{} should be required", field);
            assert_eq!(missing_address_fields(&incomplete), vec![field.to_string()]);
        }
    }

    #[test]
    fn test_phone_without_digits_rejects_address() {
        for phone in ["n/a", "-- --", "00"] {
            let mut invalid = address();
            invalid.phone = phone.to_string();
            assert!(validate_phone(phone).is_err(), "{:?} should be rejected", phone);
            assert_eq!(missing_address_fields(&invalid), vec!["phone".to_string()]);
        }
        assert!(validate_phone("0888 123 456").is_ok());
    }

    #[test]
    fn test_optional_fields_not_required() {
        let mut minimal = address();
        minimal.email = None;
        minimal.country_code = None;
        assert!(is_valid_address(&minimal));
    }

    #[test]
    fn test_validate_weight_bounds() {
        assert!(validate_weight(0.1).is_ok());
        assert!(validate_weight(100.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-2.0).is_err());
        assert!(validate_weight(100.01).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0888 123 456", "359"), "359888123456");
        assert_eq!(normalize_phone("+359 (888) 123-456", "359"), "359888123456");
        assert_eq!(normalize_phone("00359888123456", "359"), "359888123456");
        assert_eq!(normalize_phone("", "359"), "");
    }

    #[test]
    fn test_normalize_phone_is_idempotent() {
        let inputs = [
            "0888123456",
            "+359888123456",
            "00 359 2 981 1111",
            "02/981-1111",
            "000888",
            "abc",
        ];
        for input in inputs {
            let once = normalize_phone(input, DEFAULT_CALLING_CODE);
            let twice = normalize_phone(&once, DEFAULT_CALLING_CODE);
            assert_eq!(once, twice, "normalizing {:?} twice changed the result", input);
        }
    }
}
