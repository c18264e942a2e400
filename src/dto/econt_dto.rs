//! DTOs para la API JSON de Econt
//!
//! Econt usa autenticación Basic y devuelve los errores de negocio dentro
//! de una respuesta 200 con `type` y `message`.

use serde::{Deserialize, Serialize};

/// Código ISO alfa-3 de Bulgaria
pub const ECONT_COUNTRY_CODE: &str = "BGR";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontOfficesRequest {
    pub country_code: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct EcontOfficesResponse {
    #[serde(default)]
    pub offices: Vec<EcontOffice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontOffice {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    #[serde(default)]
    pub address: Option<EcontOfficeAddress>,
    #[serde(default)]
    pub normal_business_hours_from: Option<String>,
    #[serde(default)]
    pub normal_business_hours_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontOfficeAddress {
    #[serde(default)]
    pub city: Option<EcontCity>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub full_address_en: Option<String>,
    #[serde(default)]
    pub location: Option<EcontLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontCity {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default)]
    pub post_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<EcontCountry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcontCountry {
    pub code3: String,
}

#[derive(Debug, Deserialize)]
pub struct EcontLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Modo de `createLabel`: sólo calcular o crear el envío
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EcontLabelMode {
    Calculate,
    Create,
}

#[derive(Debug, Serialize)]
pub struct EcontLabelRequest {
    pub label: EcontLabel,
    pub mode: EcontLabelMode,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_client: Option<EcontClientProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<EcontAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_office_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_client: Option<EcontClientProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_address: Option<EcontAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_office_code: Option<String>,
    pub pack_count: u32,
    pub shipment_type: &'static str,
    pub weight: f64,
    #[serde(rename = "shipmentDimensionsL", skip_serializing_if = "Option::is_none")]
    pub shipment_dimensions_l: Option<f64>,
    #[serde(rename = "shipmentDimensionsW", skip_serializing_if = "Option::is_none")]
    pub shipment_dimensions_w: Option<f64>,
    #[serde(rename = "shipmentDimensionsH", skip_serializing_if = "Option::is_none")]
    pub shipment_dimensions_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<EcontServices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_after_accept: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct EcontClientProfile {
    pub name: String,
    pub phones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EcontAddress {
    pub city: EcontCity,
    pub other: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontServices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cd_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cd_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cd_currency: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value_currency: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_documents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_shipment: Option<bool>,
}

/// Respuesta de `createLabel`; si hay `message` sin `label` es un error de negocio
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontLabelResponse {
    #[serde(default)]
    pub label: Option<EcontLabelResult>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inner_errors: Vec<EcontInnerError>,
}

#[derive(Debug, Deserialize)]
pub struct EcontInnerError {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontLabelResult {
    #[serde(default)]
    pub shipment_number: Option<String>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub send_date: Option<String>,
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    #[serde(rename = "pdfURL", default)]
    pub pdf_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontShipmentNumbers {
    pub shipment_numbers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EcontDeleteResponse {
    #[serde(default)]
    pub results: Vec<EcontDeleteResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontDeleteResult {
    #[serde(default)]
    pub shipment_num: Option<String>,
    #[serde(default)]
    pub error: Option<EcontInnerError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontStatusesResponse {
    #[serde(default)]
    pub shipment_statuses: Vec<EcontStatusEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EcontStatusEntry {
    #[serde(default)]
    pub status: Option<EcontShipmentStatus>,
    #[serde(default)]
    pub error: Option<EcontInnerError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontShipmentStatus {
    pub shipment_number: String,
    #[serde(default)]
    pub short_delivery_status: Option<String>,
    #[serde(default)]
    pub short_delivery_status_en: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub expected_delivery_date: Option<String>,
    #[serde(rename = "pdfURL", default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub tracking_events: Vec<EcontTrackingEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcontTrackingEvent {
    #[serde(default)]
    pub destination_type: String,
    #[serde(default)]
    pub destination_details: Option<String>,
    #[serde(default)]
    pub destination_details_en: Option<String>,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    pub time: String,
}
