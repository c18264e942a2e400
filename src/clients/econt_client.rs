//! Adaptador para Econt
//!
//! Cálculo y creación comparten el endpoint `createLabel` y sólo cambian
//! de `mode`. Econt no filtra oficinas por nombre de ciudad, así que el
//! filtrado se hace aquí sobre la lista completa.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Serialize;

use crate::clients::carrier_client::{delivery_days_between, parse_timestamp, AuthScheme, CarrierClient};
use crate::clients::provider::DeliveryProvider;
use crate::config::environment::CarrierSettings;
use crate::dto::econt_dto::*;
use crate::models::delivery::{
    DeliveryAddress, DeliveryCalculationRequest, DeliveryCalculationResponse, DeliveryOffice,
    DeliveryPoint, Dimensions, ShipmentRequest, ShipmentResponse, TrackingEvent, TrackingInfo,
    TrackingStatus,
};
use crate::utils::errors::{DeliveryError, DeliveryResult};

pub const ECONT_PROVIDER: &str = "econt";
const ECONT_DISPLAY_NAME: &str = "Econt";
const SERVICE_NAME: &str = "Econt Standard";
const CURRENCY: &str = "BGN";

const OFFICES_ENDPOINT: &str = "Nomenclatures/NomenclaturesService.getOffices.json";
const LABEL_ENDPOINT: &str = "Shipments/LabelService.createLabel.json";
const DELETE_ENDPOINT: &str = "Shipments/LabelService.deleteLabels.json";
const STATUS_ENDPOINT: &str = "Shipments/ShipmentService.getShipmentStatuses.json";

/// Estados cortos de Econt (en inglés) al estado normalizado
const STATUS_TABLE: &[(&str, TrackingStatus)] = &[
    ("prepared", TrackingStatus::Pending),
    ("created", TrackingStatus::Pending),
    ("accepted", TrackingStatus::InTransit),
    ("in transit", TrackingStatus::InTransit),
    ("arrived in office", TrackingStatus::InTransit),
    ("out for delivery", TrackingStatus::InTransit),
    ("delivered", TrackingStatus::Delivered),
    ("returned", TrackingStatus::Returned),
    ("returned to sender", TrackingStatus::Returned),
    ("cancelled", TrackingStatus::Cancelled),
    ("deleted", TrackingStatus::Cancelled),
];

/// Mapear un estado de Econt; desconocidos → `InTransit`
pub fn map_status(code: &str) -> TrackingStatus {
    TrackingStatus::from_table(STATUS_TABLE, code)
}

pub struct EcontClient {
    client: CarrierClient,
}

impl EcontClient {
    pub fn new(settings: CarrierSettings, calling_code: &str, timeout: std::time::Duration) -> DeliveryResult<Self> {
        Ok(Self {
            client: CarrierClient::new(ECONT_DISPLAY_NAME, settings, AuthScheme::Basic, calling_code, timeout)?,
        })
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(&self, endpoint: &str, body: &B) -> DeliveryResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| DeliveryError::api(ECONT_DISPLAY_NAME, format!("cannot encode request: {}", e)))?;
        self.client.request_as(Method::POST, endpoint, Some(body)).await
    }

    fn client_profile(&self, address: &DeliveryAddress) -> EcontClientProfile {
        EcontClientProfile {
            name: address.company.clone().unwrap_or_else(|| address.full_name()),
            phones: vec![self.client.normalize_phone(&address.phone)],
            email: address.email.clone(),
        }
    }

    fn econt_address(address: &DeliveryAddress) -> EcontAddress {
        EcontAddress {
            city: EcontCity {
                name: address.city.trim().to_string(),
                name_en: None,
                post_code: address.zip.trim().to_string(),
                country: Some(EcontCountry {
                    code3: ECONT_COUNTRY_CODE.to_string(),
                }),
            },
            other: address.street_line(),
        }
    }

    /// Rellenar remitente o destinatario del label según el tipo de punto
    fn apply_point(&self, label: &mut EcontLabel, point: &DeliveryPoint, is_sender: bool) {
        match (point, is_sender) {
            (DeliveryPoint::Office { office_id }, true) => {
                label.sender_office_code = Some(office_id.trim().to_string());
            }
            (DeliveryPoint::Office { office_id }, false) => {
                label.receiver_office_code = Some(office_id.trim().to_string());
            }
            (DeliveryPoint::Address(address), true) => {
                label.sender_client = Some(self.client_profile(address));
                label.sender_address = Some(Self::econt_address(address));
            }
            (DeliveryPoint::Address(address), false) => {
                label.receiver_client = Some(self.client_profile(address));
                label.receiver_address = Some(Self::econt_address(address));
            }
        }
    }

    fn services(
        cod_amount: Option<f64>,
        declared_value: Option<f64>,
        return_documents: Option<bool>,
        return_shipment: Option<bool>,
    ) -> Option<EcontServices> {
        let cod_amount = cod_amount.filter(|a| *a > 0.0);
        let declared_value = declared_value.filter(|a| *a > 0.0);
        let return_documents = return_documents.filter(|flag| *flag);
        let return_shipment = return_shipment.filter(|flag| *flag);
        if cod_amount.is_none() && declared_value.is_none() && return_documents.is_none() && return_shipment.is_none() {
            return None;
        }
        Some(EcontServices {
            cd_amount: cod_amount,
            cd_type: cod_amount.map(|_| "get"),
            cd_currency: cod_amount.map(|_| CURRENCY),
            declared_value_amount: declared_value,
            declared_value_currency: declared_value.map(|_| CURRENCY),
            return_documents,
            return_shipment,
        })
    }

    fn apply_dimensions(label: &mut EcontLabel, dimensions: Option<Dimensions>) {
        if let Some(d) = dimensions {
            label.shipment_dimensions_l = Some(d.length);
            label.shipment_dimensions_w = Some(d.width);
            label.shipment_dimensions_h = Some(d.height);
        }
    }

    /// Mensajes de error de negocio de una respuesta `createLabel`
    fn label_errors(response: &EcontLabelResponse) -> Vec<String> {
        let mut errors: Vec<String> = response
            .message
            .iter()
            .chain(response.inner_errors.iter().filter_map(|e| e.message.as_ref()))
            .filter(|msg| !msg.trim().is_empty())
            .cloned()
            .collect();
        if errors.is_empty() && (response.label.is_none() || response.error_type.is_some()) {
            errors.push(
                response
                    .error_type
                    .clone()
                    .unwrap_or_else(|| "Econt returned no label".to_string()),
            );
        }
        errors
    }

    fn map_office(office: EcontOffice) -> DeliveryOffice {
        let address = office.address.unwrap_or_default();
        let (city, zip) = match address.city {
            Some(city) => (
                city.name_en.filter(|n| !n.trim().is_empty()).unwrap_or(city.name),
                city.post_code,
            ),
            None => (String::new(), String::new()),
        };
        let working_hours = match (office.normal_business_hours_from, office.normal_business_hours_to) {
            (Some(from), Some(to)) => Some(format!("{} - {}", from, to)),
            _ => None,
        };

        DeliveryOffice {
            id: office.code,
            name: office
                .name_en
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(office.name),
            address: address
                .full_address_en
                .filter(|a| !a.trim().is_empty())
                .or(address.full_address)
                .unwrap_or_default(),
            city,
            zip,
            phone: office.phones.into_iter().next(),
            working_hours,
            latitude: address.location.as_ref().map(|l| l.latitude),
            longitude: address.location.as_ref().map(|l| l.longitude),
            provider: ECONT_PROVIDER.to_string(),
        }
    }

    fn office_in_city(office: &EcontOffice, city: &str) -> bool {
        let Some(office_city) = office.address.as_ref().and_then(|a| a.city.as_ref()) else {
            return false;
        };
        office_city.name.trim().to_lowercase() == city
            || office_city
                .name_en
                .as_deref()
                .is_some_and(|en| en.trim().to_lowercase() == city)
    }

    fn map_event(event: EcontTrackingEvent) -> Option<TrackingEvent> {
        let timestamp = match parse_timestamp(&event.time) {
            Some(timestamp) => timestamp,
            None => {
                log::warn!("⚠️ Econt: fecha de evento ilegible '{}'", event.time);
                return None;
            }
        };
        let location = event
            .office_name
            .or(event.city_name)
            .filter(|name| !name.trim().is_empty());
        let description = event
            .destination_details_en
            .filter(|d| !d.trim().is_empty())
            .or(event.destination_details)
            .unwrap_or_else(|| event.destination_type.clone());

        Some(TrackingEvent {
            timestamp,
            status: event.destination_type,
            description,
            location,
        })
    }

    async fn fetch_status(&self, shipment_number: &str) -> DeliveryResult<EcontShipmentStatus> {
        let request = EcontShipmentNumbers {
            shipment_numbers: vec![shipment_number.to_string()],
        };
        let response: EcontStatusesResponse = self.post(STATUS_ENDPOINT, &request).await?;
        let entry = response.shipment_statuses.into_iter().next().ok_or_else(|| {
            DeliveryError::api(ECONT_DISPLAY_NAME, format!("shipment {} not found", shipment_number))
        })?;
        if let Some(message) = entry.error.and_then(|e| e.message) {
            return Err(DeliveryError::api(ECONT_DISPLAY_NAME, message));
        }
        entry.status.ok_or_else(|| {
            DeliveryError::api(ECONT_DISPLAY_NAME, format!("shipment {} has no status", shipment_number))
        })
    }
}

#[async_trait]
impl DeliveryProvider for EcontClient {
    fn provider(&self) -> &str {
        ECONT_PROVIDER
    }

    fn display_name(&self) -> &str {
        ECONT_DISPLAY_NAME
    }

    async fn get_offices(&self, city: Option<&str>) -> DeliveryResult<Vec<DeliveryOffice>> {
        let request = EcontOfficesRequest {
            country_code: ECONT_COUNTRY_CODE,
        };
        let response: EcontOfficesResponse = self.post(OFFICES_ENDPOINT, &request).await?;

        let city = city.map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty());
        let offices: Vec<DeliveryOffice> = response
            .offices
            .into_iter()
            .filter(|office| match &city {
                Some(city) => Self::office_in_city(office, city),
                None => true,
            })
            .map(Self::map_office)
            .collect();

        log::info!("🏢 Econt: {} oficinas", offices.len());
        Ok(offices)
    }

    async fn calculate_price(
        &self,
        request: &DeliveryCalculationRequest,
    ) -> DeliveryResult<DeliveryCalculationResponse> {
        self.client.ensure_weight(request.weight)?;
        for address in [request.from.address(), request.to.address()].into_iter().flatten() {
            self.client.ensure_address(address)?;
        }

        let mut label = EcontLabel {
            pack_count: 1,
            shipment_type: "PACK",
            weight: request.weight,
            services: Self::services(
                request.cod_amount,
                request.declared_value,
                request.return_documents,
                request.return_shipment,
            ),
            ..Default::default()
        };
        self.apply_point(&mut label, &request.from, true);
        self.apply_point(&mut label, &request.to, false);
        Self::apply_dimensions(&mut label, request.dimensions);

        let payload = EcontLabelRequest {
            label,
            mode: EcontLabelMode::Calculate,
        };
        let response: EcontLabelResponse = self.post(LABEL_ENDPOINT, &payload).await?;

        let errors = Self::label_errors(&response);
        let result = match response.label {
            Some(result) if errors.is_empty() => result,
            _ => return Ok(DeliveryCalculationResponse::failed(ECONT_PROVIDER, errors)),
        };

        Ok(DeliveryCalculationResponse {
            provider: ECONT_PROVIDER.to_string(),
            service_name: SERVICE_NAME.to_string(),
            price: result.total_price,
            currency: result.currency.unwrap_or_else(|| CURRENCY.to_string()),
            delivery_days: delivery_days_between(
                result.send_date.as_deref(),
                result.expected_delivery_date.as_deref(),
            )
            .unwrap_or(1),
            errors: None,
        })
    }

    async fn create_shipment(&self, request: &ShipmentRequest) -> DeliveryResult<ShipmentResponse> {
        self.client.ensure_weight(request.weight)?;
        self.client.ensure_address(&request.sender)?;
        if let Some(address) = request.recipient.address() {
            self.client.ensure_address(address)?;
        }

        let mut label = EcontLabel {
            pack_count: request.pack_count(),
            shipment_type: "PACK",
            weight: request.weight,
            shipment_description: Some(request.contents.clone()),
            order_number: request.notes.clone(),
            services: Self::services(
                request.cod_amount,
                request.declared_value,
                request.return_documents,
                request.return_shipment,
            ),
            ..Default::default()
        };
        self.apply_point(&mut label, &DeliveryPoint::Address(request.sender.clone()), true);
        self.apply_point(&mut label, &request.recipient, false);
        Self::apply_dimensions(&mut label, request.dimensions);

        let payload = EcontLabelRequest {
            label,
            mode: EcontLabelMode::Create,
        };
        let response: EcontLabelResponse = self.post(LABEL_ENDPOINT, &payload).await?;

        let errors = Self::label_errors(&response);
        let result = match response.label {
            Some(result) if errors.is_empty() => result,
            _ => return Ok(ShipmentResponse::failed(ECONT_PROVIDER, errors)),
        };
        let shipment_number = match result.shipment_number {
            Some(number) if !number.trim().is_empty() => number,
            _ => {
                return Ok(ShipmentResponse::failed(
                    ECONT_PROVIDER,
                    vec!["Econt created a label without shipment number".to_string()],
                ))
            }
        };

        log::info!("📦 Econt: envío {} creado", shipment_number);
        Ok(ShipmentResponse {
            provider: ECONT_PROVIDER.to_string(),
            shipment_id: shipment_number.clone(),
            tracking_number: shipment_number,
            label_url: result.pdf_url,
            estimated_delivery_date: result.expected_delivery_date,
            price: result.total_price,
            currency: result.currency.unwrap_or_else(|| CURRENCY.to_string()),
            errors: None,
        })
    }

    async fn cancel_shipment(&self, shipment_id: &str) -> bool {
        let request = EcontShipmentNumbers {
            shipment_numbers: vec![shipment_id.to_string()],
        };
        let result: DeliveryResult<EcontDeleteResponse> = self.post(DELETE_ENDPOINT, &request).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!("⚠️ Error cancelando envío Econt {}: {}", shipment_id, e);
                return false;
            }
        };

        let entry = response
            .results
            .into_iter()
            .find(|r| r.shipment_num.as_deref().map_or(true, |num| num == shipment_id));
        match entry {
            Some(EcontDeleteResult { error: None, .. }) => {
                log::info!("🗑️ Econt: envío {} cancelado", shipment_id);
                true
            }
            Some(EcontDeleteResult { error: Some(error), .. }) => {
                log::warn!(
                    "⚠️ Econt no canceló el envío {}: {}",
                    shipment_id,
                    error.message.unwrap_or_default()
                );
                false
            }
            None => {
                log::warn!("⚠️ Econt no devolvió resultado para el envío {}", shipment_id);
                false
            }
        }
    }

    async fn track_shipment(&self, tracking_number: &str) -> DeliveryResult<TrackingInfo> {
        let status = self.fetch_status(tracking_number).await?;

        // Econt devuelve los eventos en orden cronológico ascendente
        let mut events: Vec<TrackingEvent> = status.tracking_events.into_iter().filter_map(Self::map_event).collect();
        events.reverse();

        let status_text = status
            .short_delivery_status_en
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| status.short_delivery_status.clone())
            .unwrap_or_default();
        let normalized = if status_text.is_empty() {
            TrackingStatus::Pending
        } else {
            map_status(&status_text)
        };
        let actual_delivery = status.delivery_time.as_deref().and_then(parse_timestamp);

        Ok(TrackingInfo {
            provider: ECONT_PROVIDER.to_string(),
            tracking_number: status.shipment_number,
            status: normalized,
            status_description: status_text,
            last_update: events
                .first()
                .map(|e| e.timestamp)
                .or(actual_delivery)
                .unwrap_or_else(Utc::now),
            events,
            estimated_delivery: status.expected_delivery_date.as_deref().and_then(parse_timestamp),
            actual_delivery,
        })
    }

    async fn get_label(&self, shipment_id: &str) -> DeliveryResult<String> {
        let status = self.fetch_status(shipment_id).await?;
        status
            .pdf_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DeliveryError::api(ECONT_DISPLAY_NAME, format!("no label available for shipment {}", shipment_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_case_insensitive() {
        assert_eq!(map_status("Delivered"), TrackingStatus::Delivered);
        assert_eq!(map_status("IN TRANSIT"), TrackingStatus::InTransit);
        assert_eq!(map_status("returned to sender"), TrackingStatus::Returned);
        assert_eq!(map_status("deleted"), TrackingStatus::Cancelled);
        assert_eq!(map_status("prepared"), TrackingStatus::Pending);
    }

    #[test]
    fn test_map_status_is_total() {
        for input in ["", "???", "доставена", "delivered!", "42", "\t"] {
            assert!(TrackingStatus::ALL.contains(&map_status(input)));
        }
        assert_eq!(map_status("доставена"), TrackingStatus::InTransit);
    }

    #[test]
    fn test_label_errors_from_business_failure() {
        let response = EcontLabelResponse {
            label: None,
            error_type: Some("ExInvalidParam".to_string()),
            message: Some("Invalid receiver address".to_string()),
            inner_errors: vec![EcontInnerError {
                message: Some("City not found".to_string()),
            }],
        };
        assert_eq!(
            EcontClient::label_errors(&response),
            vec!["Invalid receiver address".to_string(), "City not found".to_string()]
        );
    }

    #[test]
    fn test_label_errors_missing_label() {
        let response = EcontLabelResponse {
            label: None,
            error_type: None,
            message: None,
            inner_errors: Vec::new(),
        };
        assert_eq!(EcontClient::label_errors(&response), vec!["Econt returned no label".to_string()]);
    }

    #[test]
    fn test_services_only_when_requested() {
        assert!(EcontClient::services(None, None, Some(false), None).is_none());
        let services = EcontClient::services(Some(30.0), Some(100.0), None, None).unwrap();
        assert_eq!(services.cd_type, Some("get"));
        assert_eq!(services.declared_value_currency, Some("BGN"));
    }

    #[test]
    fn test_map_office_prefers_english_fields() {
        let office = EcontOffice {
            id: Some(1),
            code: "1127".to_string(),
            name: "София Център".to_string(),
            name_en: Some("Sofia Center".to_string()),
            phones: vec!["+359 2 123 456".to_string()],
            address: Some(EcontOfficeAddress {
                city: Some(EcontCity {
                    name: "София".to_string(),
                    name_en: Some("Sofia".to_string()),
                    post_code: "1000".to_string(),
                    country: None,
                }),
                full_address: Some("ул. Пиротска 5".to_string()),
                full_address_en: Some("5 Pirotska St".to_string()),
                location: Some(EcontLocation {
                    latitude: 42.7,
                    longitude: 23.32,
                }),
            }),
            normal_business_hours_from: None,
            normal_business_hours_to: None,
        };

        let mapped = EcontClient::map_office(office);
        assert_eq!(mapped.id, "1127");
        assert_eq!(mapped.name, "Sofia Center");
        assert_eq!(mapped.city, "Sofia");
        assert_eq!(mapped.address, "5 Pirotska St");
        assert_eq!(mapped.phone.as_deref(), Some("+359 2 123 456"));
        assert_eq!(mapped.provider, "econt");
    }
}
