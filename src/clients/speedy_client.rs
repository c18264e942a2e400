//! Adaptador para Speedy
//!
//! Traduce las operaciones de `DeliveryProvider` a la API REST de Speedy.
//! Speedy identifica las ciudades por un `siteId` numérico que hay que
//! resolver a partir del nombre antes de pedir oficinas o precios con
//! dirección.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Serialize;

use crate::clients::carrier_client::{delivery_days_between, parse_timestamp, AuthScheme, CarrierClient};
use crate::clients::provider::DeliveryProvider;
use crate::config::environment::CarrierSettings;
use crate::dto::speedy_dto::*;
use crate::models::delivery::{
    DeliveryAddress, DeliveryCalculationRequest, DeliveryCalculationResponse, DeliveryOffice,
    DeliveryPoint, Dimensions, ShipmentRequest, ShipmentResponse, TrackingEvent, TrackingInfo,
    TrackingStatus,
};
use crate::utils::errors::{DeliveryError, DeliveryResult};

pub const SPEEDY_PROVIDER: &str = "speedy";
const SPEEDY_DISPLAY_NAME: &str = "Speedy";
const LANGUAGE: &str = "EN";
const SERVICE_NAME: &str = "Speedy Standard";
const LABEL_PAPER_SIZE: &str = "A6";
const LABEL_FORMAT: &str = "pdf";

/// Tabla de códigos de operación de Speedy al estado normalizado
const STATUS_TABLE: &[(&str, TrackingStatus)] = &[
    ("0", TrackingStatus::Pending),
    ("-1", TrackingStatus::Pending),
    ("1", TrackingStatus::InTransit),
    ("2", TrackingStatus::InTransit),
    ("11", TrackingStatus::InTransit),
    ("12", TrackingStatus::InTransit),
    ("44", TrackingStatus::InTransit),
    ("134", TrackingStatus::InTransit),
    ("148", TrackingStatus::InTransit),
    ("-14", TrackingStatus::Delivered),
    ("-15", TrackingStatus::Returned),
    ("-31", TrackingStatus::Returned),
    ("124", TrackingStatus::Returned),
    ("-122", TrackingStatus::Cancelled),
    ("115", TrackingStatus::Cancelled),
];

/// Mapear un código de operación de Speedy; desconocidos → `InTransit`
pub fn map_status(code: &str) -> TrackingStatus {
    TrackingStatus::from_table(STATUS_TABLE, code)
}

pub struct SpeedyClient {
    client: CarrierClient,
}

impl SpeedyClient {
    pub fn new(settings: CarrierSettings, calling_code: &str, timeout: std::time::Duration) -> DeliveryResult<Self> {
        Ok(Self {
            client: CarrierClient::new(
                SPEEDY_DISPLAY_NAME,
                settings,
                AuthScheme::BodyCredentials,
                calling_code,
                timeout,
            )?,
        })
    }

    /// URL de impresión de etiqueta; Speedy la construye a partir de
    /// parámetros de consulta, sin llamada de red.
    pub fn label_url(&self, shipment_id: &str) -> String {
        let settings = self.client.settings();
        format!(
            "{}/print?userName={}&password={}&parcels={}&paperSize={}&format={}",
            settings.base_url,
            urlencoding::encode(&settings.username),
            urlencoding::encode(&settings.password),
            urlencoding::encode(shipment_id),
            LABEL_PAPER_SIZE,
            LABEL_FORMAT
        )
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(&self, endpoint: &str, body: &B) -> DeliveryResult<T> {
        let body = serde_json::to_value(body)
            .map_err(|e| DeliveryError::api(SPEEDY_DISPLAY_NAME, format!("cannot encode request: {}", e)))?;
        self.client.request_as(Method::POST, endpoint, Some(body)).await
    }

    /// Resolver el `siteId` de Speedy para una ciudad
    async fn resolve_site_id(&self, city: &str) -> DeliveryResult<Option<i64>> {
        let request = SpeedySiteRequest {
            language: LANGUAGE,
            country_id: SPEEDY_BULGARIA_ID,
            name: city.trim().to_string(),
        };
        let response: SpeedySiteResponse = self.post("location/site", &request).await?;
        if let Some(error) = response.error {
            return Err(DeliveryError::api(SPEEDY_DISPLAY_NAME, error.message));
        }

        let wanted = city.trim();
        let site = response
            .sites
            .iter()
            .find(|site| {
                site.name.eq_ignore_ascii_case(wanted)
                    || site.name_en.as_deref().is_some_and(|en| en.eq_ignore_ascii_case(wanted))
            })
            .or_else(|| response.sites.first());

        Ok(site.map(|site| site.id))
    }

    fn parse_office_id(&self, office_id: &str) -> DeliveryResult<i64> {
        office_id
            .trim()
            .parse()
            .map_err(|_| DeliveryError::validation(format!("invalid Speedy office id: {}", office_id)))
    }

    /// Construir remitente/destinatario según sea oficina o dirección.
    /// `Ok(Err(msg))` indica un error de negocio (ciudad no servida).
    async fn build_party(
        &self,
        point: &DeliveryPoint,
        is_sender: bool,
        with_contact: bool,
    ) -> DeliveryResult<Result<SpeedyParty, String>> {
        match point {
            DeliveryPoint::Office { office_id } => {
                let office_id = self.parse_office_id(office_id)?;
                let mut party = SpeedyParty {
                    private_person: true,
                    ..Default::default()
                };
                if is_sender {
                    party.dropoff_office_id = Some(office_id);
                } else {
                    party.pickup_office_id = Some(office_id);
                }
                Ok(Ok(party))
            }
            DeliveryPoint::Address(address) => {
                self.client.ensure_address(address)?;
                let site_id = match self.resolve_site_id(&address.city).await? {
                    Some(site_id) => site_id,
                    None => return Ok(Err(format!("City '{}' is not serviced by Speedy", address.city))),
                };
                let mut party = self.contact_party(address, with_contact);
                if with_contact {
                    party.address = Some(SpeedyAddress {
                        country_id: SPEEDY_BULGARIA_ID,
                        site_id,
                        post_code: address.zip.trim().to_string(),
                        address_note: address.street_line(),
                    });
                } else {
                    party.address_location = Some(SpeedyAddressLocation {
                        country_id: SPEEDY_BULGARIA_ID,
                        site_id,
                        post_code: address.zip.trim().to_string(),
                    });
                }
                Ok(Ok(party))
            }
        }
    }

    fn contact_party(&self, address: &DeliveryAddress, with_contact: bool) -> SpeedyParty {
        if !with_contact {
            return SpeedyParty {
                private_person: address.company.is_none(),
                ..Default::default()
            };
        }
        SpeedyParty {
            private_person: address.company.is_none(),
            client_name: Some(address.company.clone().unwrap_or_else(|| address.full_name())),
            contact_name: address.company.as_ref().map(|_| address.full_name()),
            phone1: Some(SpeedyPhone {
                number: self.client.normalize_phone(&address.phone),
            }),
            email: address.email.clone(),
            ..Default::default()
        }
    }

    fn content(weight: f64, pack_count: u32, dimensions: Option<Dimensions>, contents: Option<String>) -> SpeedyContent {
        SpeedyContent {
            parcels_count: pack_count,
            total_weight: weight,
            package: contents.as_ref().map(|_| "BOX"),
            contents,
            parcels: dimensions
                .map(|d| {
                    vec![SpeedyParcel {
                        weight,
                        size: SpeedySize {
                            width: d.width,
                            depth: d.length,
                            height: d.height,
                        },
                    }]
                })
                .unwrap_or_default(),
        }
    }

    fn additional_services(
        cod_amount: Option<f64>,
        declared_value: Option<f64>,
        return_documents: Option<bool>,
        return_shipment: Option<bool>,
    ) -> Option<SpeedyAdditionalServices> {
        let services = SpeedyAdditionalServices {
            cod: cod_amount.filter(|a| *a > 0.0).map(|amount| SpeedyAmount {
                amount,
                processing_type: Some("CASH"),
            }),
            declared_value: declared_value.filter(|a| *a > 0.0).map(|amount| SpeedyAmount {
                amount,
                processing_type: None,
            }),
            return_documents: return_documents.filter(|flag| *flag),
            return_shipment: return_shipment.filter(|flag| *flag),
        };
        (!services.is_empty()).then_some(services)
    }

    fn map_office(office: SpeedyOffice) -> DeliveryOffice {
        let address = office.address.unwrap_or_default();
        let working_hours = match (office.working_time_from, office.working_time_to) {
            (Some(from), Some(to)) => Some(format!("{} - {}", from, to)),
            _ => None,
        };

        DeliveryOffice {
            id: office.id.to_string(),
            name: office
                .name_en
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(office.name),
            address: address
                .full_address_string
                .or(address.local_address_string)
                .unwrap_or_default(),
            city: address.site_name.unwrap_or_default(),
            zip: address.post_code.unwrap_or_default(),
            phone: office.phones.into_iter().next().map(|phone| phone.number),
            working_hours,
            latitude: address.y,
            longitude: address.x,
            provider: SPEEDY_PROVIDER.to_string(),
        }
    }

    fn map_event(operation: SpeedyOperation) -> Option<TrackingEvent> {
        let timestamp = match parse_timestamp(&operation.date_time) {
            Some(timestamp) => timestamp,
            None => {
                log::warn!("⚠️ Speedy: fecha de operación ilegible '{}'", operation.date_time);
                return None;
            }
        };
        let location = operation
            .place
            .and_then(|place| place.name_en.or(place.name))
            .filter(|name| !name.trim().is_empty());
        let description = match operation.comment.filter(|c| !c.trim().is_empty()) {
            Some(comment) if !operation.description.is_empty() => format!("{} ({})", operation.description, comment),
            Some(comment) => comment,
            None => operation.description,
        };

        Some(TrackingEvent {
            timestamp,
            status: operation.operation_code.to_string(),
            description,
            location,
        })
    }
}

#[async_trait]
impl DeliveryProvider for SpeedyClient {
    fn provider(&self) -> &str {
        SPEEDY_PROVIDER
    }

    fn display_name(&self) -> &str {
        SPEEDY_DISPLAY_NAME
    }

    async fn get_offices(&self, city: Option<&str>) -> DeliveryResult<Vec<DeliveryOffice>> {
        self.client.ensure_available()?;

        let site_id = match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => match self.resolve_site_id(city).await? {
                Some(site_id) => Some(site_id),
                None => {
                    log::info!("🔍 Speedy: sin sitio para la ciudad '{}'", city);
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        let request = SpeedyOfficeRequest {
            language: LANGUAGE,
            country_id: SPEEDY_BULGARIA_ID,
            site_id,
        };
        let response: SpeedyOfficeResponse = self.post("location/office", &request).await?;
        if let Some(error) = response.error {
            return Err(DeliveryError::api(SPEEDY_DISPLAY_NAME, error.message));
        }

        let offices: Vec<DeliveryOffice> = response.offices.into_iter().map(Self::map_office).collect();
        log::info!("🏢 Speedy: {} oficinas", offices.len());
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
        self.client.ensure_available()?;

        let sender = match self.build_party(&request.from, true, false).await? {
            Ok(party) => party,
            Err(message) => return Ok(DeliveryCalculationResponse::failed(SPEEDY_PROVIDER, vec![message])),
        };
        let recipient = match self.build_party(&request.to, false, false).await? {
            Ok(party) => party,
            Err(message) => return Ok(DeliveryCalculationResponse::failed(SPEEDY_PROVIDER, vec![message])),
        };

        let payload = SpeedyCalculationRequest {
            language: LANGUAGE,
            sender,
            recipient,
            service: SpeedyService {
                auto_adjust_pickup_date: true,
                service_ids: vec![SPEEDY_STANDARD_SERVICE_ID],
                service_id: None,
                additional_services: Self::additional_services(
                    request.cod_amount,
                    request.declared_value,
                    request.return_documents,
                    request.return_shipment,
                ),
            },
            content: Self::content(request.weight, 1, request.dimensions, None),
            payment: SpeedyPayment {
                courier_service_payer: "RECIPIENT",
            },
        };

        let response: SpeedyCalculationResponse = self.post("calculate", &payload).await?;
        if let Some(error) = response.error {
            return Ok(DeliveryCalculationResponse::failed(SPEEDY_PROVIDER, vec![error.message]));
        }

        let calculation = match response.calculations.into_iter().next() {
            Some(calculation) => calculation,
            None => {
                return Ok(DeliveryCalculationResponse::failed(
                    SPEEDY_PROVIDER,
                    vec!["No calculation returned".to_string()],
                ))
            }
        };
        if let Some(error) = calculation.error {
            return Ok(DeliveryCalculationResponse::failed(SPEEDY_PROVIDER, vec![error.message]));
        }
        let price = match calculation.price {
            Some(price) => price,
            None => {
                return Ok(DeliveryCalculationResponse::failed(
                    SPEEDY_PROVIDER,
                    vec!["Calculation returned no price".to_string()],
                ))
            }
        };

        Ok(DeliveryCalculationResponse {
            provider: SPEEDY_PROVIDER.to_string(),
            service_name: SERVICE_NAME.to_string(),
            price: price.total,
            currency: price.currency,
            delivery_days: delivery_days_between(
                calculation.pickup_date.as_deref(),
                calculation.delivery_deadline.as_deref(),
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
        self.client.ensure_available()?;

        let sender_point = DeliveryPoint::Address(request.sender.clone());
        let sender = match self.build_party(&sender_point, true, true).await? {
            Ok(party) => party,
            Err(message) => return Ok(ShipmentResponse::failed(SPEEDY_PROVIDER, vec![message])),
        };
        let recipient = match self.build_party(&request.recipient, false, true).await? {
            Ok(party) => party,
            Err(message) => return Ok(ShipmentResponse::failed(SPEEDY_PROVIDER, vec![message])),
        };

        let payload = SpeedyShipmentRequest {
            language: LANGUAGE,
            sender,
            recipient,
            service: SpeedyService {
                auto_adjust_pickup_date: true,
                service_ids: Vec::new(),
                service_id: Some(SPEEDY_STANDARD_SERVICE_ID),
                additional_services: Self::additional_services(
                    request.cod_amount,
                    request.declared_value,
                    request.return_documents,
                    request.return_shipment,
                ),
            },
            content: Self::content(
                request.weight,
                request.pack_count(),
                request.dimensions,
                Some(request.contents.clone()),
            ),
            payment: SpeedyPayment {
                courier_service_payer: "RECIPIENT",
            },
            ref1: request.notes.clone(),
        };

        let response: SpeedyShipmentResponse = self.post("shipment", &payload).await?;
        if let Some(error) = response.error {
            return Ok(ShipmentResponse::failed(SPEEDY_PROVIDER, vec![error.message]));
        }
        let shipment_id = match response.id {
            Some(id) => id,
            None => {
                return Ok(ShipmentResponse::failed(
                    SPEEDY_PROVIDER,
                    vec!["Shipment created without id".to_string()],
                ))
            }
        };
        let tracking_number = response
            .parcels
            .first()
            .map(|parcel| parcel.id.clone())
            .unwrap_or_else(|| shipment_id.clone());
        let (price, currency) = response
            .price
            .map(|price| (price.total, price.currency))
            .unwrap_or((0.0, "BGN".to_string()));

        log::info!("📦 Speedy: envío {} creado", shipment_id);
        // Misma clave que get_label: la etiqueta se pide por id de envío
        Ok(ShipmentResponse {
            provider: SPEEDY_PROVIDER.to_string(),
            label_url: Some(self.label_url(&shipment_id)),
            shipment_id,
            tracking_number,
            estimated_delivery_date: response.delivery_deadline,
            price,
            currency,
            errors: None,
        })
    }

    async fn cancel_shipment(&self, shipment_id: &str) -> bool {
        let request = SpeedyCancelRequest {
            shipment_id: shipment_id.to_string(),
            comment: "Cancelled by storefront".to_string(),
        };
        let result: DeliveryResult<SpeedyCancelResponse> = self.post("shipment/cancel", &request).await;
        match result {
            Ok(SpeedyCancelResponse { error: None }) => {
                log::info!("🗑️ Speedy: envío {} cancelado", shipment_id);
                true
            }
            Ok(SpeedyCancelResponse { error: Some(error) }) => {
                log::warn!("⚠️ Speedy no canceló el envío {}: {}", shipment_id, error.message);
                false
            }
            Err(e) => {
                log::warn!("⚠️ Error cancelando envío Speedy {}: {}", shipment_id, e);
                false
            }
        }
    }

    async fn track_shipment(&self, tracking_number: &str) -> DeliveryResult<TrackingInfo> {
        let request = SpeedyTrackRequest {
            language: LANGUAGE,
            parcels: vec![SpeedyParcelRef {
                id: tracking_number.to_string(),
            }],
        };
        let response: SpeedyTrackResponse = self.post("track", &request).await?;
        if let Some(error) = response.error {
            return Err(DeliveryError::api(SPEEDY_DISPLAY_NAME, error.message));
        }
        let parcel = response
            .parcels
            .into_iter()
            .next()
            .ok_or_else(|| DeliveryError::api(SPEEDY_DISPLAY_NAME, format!("parcel {} not found", tracking_number)))?;
        if let Some(error) = parcel.error {
            return Err(DeliveryError::api(SPEEDY_DISPLAY_NAME, error.message));
        }

        // Speedy devuelve las operaciones de la más antigua a la más reciente
        let mut events: Vec<TrackingEvent> = parcel.operations.into_iter().filter_map(Self::map_event).collect();
        events.reverse();

        let status = events
            .first()
            .map(|event| map_status(&event.status))
            .unwrap_or(TrackingStatus::Pending);
        let actual_delivery = events
            .iter()
            .find(|event| map_status(&event.status) == TrackingStatus::Delivered)
            .map(|event| event.timestamp);

        Ok(TrackingInfo {
            provider: SPEEDY_PROVIDER.to_string(),
            tracking_number: parcel.parcel_id,
            status,
            status_description: events.first().map(|e| e.description.clone()).unwrap_or_default(),
            last_update: events.first().map(|e| e.timestamp).unwrap_or_else(Utc::now),
            events,
            estimated_delivery: None,
            actual_delivery,
        })
    }

    async fn get_label(&self, shipment_id: &str) -> DeliveryResult<String> {
        self.client.ensure_available()?;
        Ok(self.label_url(shipment_id))
    }
}
