//! DTOs para la API REST de Speedy
//!
//! Formas nativas de petición/respuesta. Las credenciales (`userName`,
//! `password`) las añade `CarrierClient` al cuerpo.

use serde::{Deserialize, Serialize};

/// Código de país de Bulgaria en la nomenclatura de Speedy
pub const SPEEDY_BULGARIA_ID: i64 = 100;

/// Servicio estándar doméstico
pub const SPEEDY_STANDARD_SERVICE_ID: i64 = 505;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedySiteRequest {
    pub language: &'static str,
    pub country_id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyOfficeRequest {
    pub language: &'static str,
    pub country_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
}

/// Error de negocio embebido en una respuesta 200
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SpeedySiteResponse {
    #[serde(default)]
    pub sites: Vec<SpeedySite>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedySite {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeedyOfficeResponse {
    #[serde(default)]
    pub offices: Vec<SpeedyOffice>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyOffice {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub address: Option<SpeedyOfficeAddress>,
    #[serde(default)]
    pub working_time_from: Option<String>,
    #[serde(default)]
    pub working_time_to: Option<String>,
    #[serde(default)]
    pub phones: Vec<SpeedyPhone>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyOfficeAddress {
    #[serde(default)]
    pub full_address_string: Option<String>,
    #[serde(default)]
    pub local_address_string: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    /// Longitud
    #[serde(default)]
    pub x: Option<f64>,
    /// Latitud
    #[serde(default)]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedyPhone {
    pub number: String,
}

/// Remitente o destinatario en peticiones de cálculo y creación
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyParty {
    pub private_person: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<SpeedyPhone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff_office_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_office_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_location: Option<SpeedyAddressLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<SpeedyAddress>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyAddressLocation {
    pub country_id: i64,
    pub site_id: i64,
    pub post_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyAddress {
    pub country_id: i64,
    pub site_id: i64,
    pub post_code: String,
    pub address_note: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyService {
    pub auto_adjust_pickup_date: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_services: Option<SpeedyAdditionalServices>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyAdditionalServices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod: Option<SpeedyAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<SpeedyAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_shipment: Option<bool>,
}

impl SpeedyAdditionalServices {
    pub fn is_empty(&self) -> bool {
        self.cod.is_none()
            && self.declared_value.is_none()
            && self.return_documents.is_none()
            && self.return_shipment.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyAmount {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyContent {
    pub parcels_count: u32,
    pub total_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parcels: Vec<SpeedyParcel>,
}

#[derive(Debug, Serialize)]
pub struct SpeedyParcel {
    pub weight: f64,
    pub size: SpeedySize,
}

/// Medidas en centímetros
#[derive(Debug, Serialize)]
pub struct SpeedySize {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyPayment {
    pub courier_service_payer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SpeedyCalculationRequest {
    pub language: &'static str,
    pub sender: SpeedyParty,
    pub recipient: SpeedyParty,
    pub service: SpeedyService,
    pub content: SpeedyContent,
    pub payment: SpeedyPayment,
}

#[derive(Debug, Serialize)]
pub struct SpeedyShipmentRequest {
    pub language: &'static str,
    pub sender: SpeedyParty,
    pub recipient: SpeedyParty,
    pub service: SpeedyService,
    pub content: SpeedyContent,
    pub payment: SpeedyPayment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref1: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeedyCalculationResponse {
    #[serde(default)]
    pub calculations: Vec<SpeedyCalculation>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyCalculation {
    pub service_id: i64,
    #[serde(default)]
    pub price: Option<SpeedyPrice>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub delivery_deadline: Option<String>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyPrice {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub vat: f64,
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyShipmentResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parcels: Vec<SpeedyCreatedParcel>,
    #[serde(default)]
    pub price: Option<SpeedyPrice>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    #[serde(default)]
    pub delivery_deadline: Option<String>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyCreatedParcel {
    pub id: String,
    #[serde(default)]
    pub seq_no: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyCancelRequest {
    pub shipment_id: String,
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpeedyCancelResponse {
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Serialize)]
pub struct SpeedyTrackRequest {
    pub language: &'static str,
    pub parcels: Vec<SpeedyParcelRef>,
}

#[derive(Debug, Serialize)]
pub struct SpeedyParcelRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeedyTrackResponse {
    #[serde(default)]
    pub parcels: Vec<SpeedyTrackedParcel>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyTrackedParcel {
    pub parcel_id: String,
    #[serde(default)]
    pub operations: Vec<SpeedyOperation>,
    #[serde(default)]
    pub error: Option<SpeedyError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyOperation {
    pub date_time: String,
    pub operation_code: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub place: Option<SpeedyPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedyPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
}
