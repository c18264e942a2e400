//! Controlador de envíos
//!
//! Endpoints HTTP sobre el `DeliveryManager`: operaciones agregadas sobre
//! todos los transportistas y operaciones dirigidas a uno concreto.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::clients::provider::DeliveryProvider;
use crate::dto::delivery_dto::*;
use crate::models::delivery::{
    DeliveryCalculationRequest, DeliveryCalculationResponse, DeliveryOffice, ShipmentRequest,
    ShipmentResponse, TrackingInfo,
};
use crate::state::AppState;
use crate::utils::errors::{AppResult, DeliveryError};

const NO_OPTION_MESSAGE: &str = "No carrier returned a valid quote";

fn provider_for(state: &AppState, tag: &str) -> AppResult<Arc<dyn DeliveryProvider>> {
    state
        .manager
        .get_provider(tag)
        .ok_or_else(|| DeliveryError::UnknownProvider(tag.to_string()).into())
}

/// Oficinas de todos los transportistas
pub async fn get_all_offices(
    State(state): State<AppState>,
    Query(query): Query<OfficesQuery>,
) -> AppResult<Json<Vec<DeliveryOffice>>> {
    let offices = state.manager.get_all_offices(query.city.as_deref()).await;
    log::info!("🏢 {} oficinas devueltas", offices.len());
    Ok(Json(offices))
}

/// Búsqueda de oficinas en todos los transportistas
pub async fn search_offices(
    State(state): State<AppState>,
    Query(query): Query<OfficeSearchQuery>,
) -> AppResult<Json<Vec<DeliveryOffice>>> {
    query.validate()?;
    Ok(Json(state.manager.search_all_offices(query.q.trim()).await))
}

/// Cotización de todos los transportistas
pub async fn calculate_prices(
    State(state): State<AppState>,
    Json(request): Json<DeliveryCalculationRequest>,
) -> AppResult<Json<Vec<DeliveryCalculationResponse>>> {
    request.validate()?;
    Ok(Json(state.manager.calculate_all_prices(&request).await))
}

pub async fn cheapest_option(
    State(state): State<AppState>,
    Json(request): Json<DeliveryCalculationRequest>,
) -> AppResult<Json<ApiResponse<DeliveryCalculationResponse>>> {
    request.validate()?;
    Ok(Json(match state.manager.get_cheapest_option(&request).await {
        Some(option) => ApiResponse::success(option),
        None => ApiResponse::empty(NO_OPTION_MESSAGE),
    }))
}

pub async fn fastest_option(
    State(state): State<AppState>,
    Json(request): Json<DeliveryCalculationRequest>,
) -> AppResult<Json<ApiResponse<DeliveryCalculationResponse>>> {
    request.validate()?;
    Ok(Json(match state.manager.get_fastest_option(&request).await {
        Some(option) => ApiResponse::success(option),
        None => ApiResponse::empty(NO_OPTION_MESSAGE),
    }))
}

/// Transportistas registrados, en orden de registro
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    Json(
        state
            .manager
            .providers()
            .iter()
            .map(|p| ProviderInfo {
                provider: p.provider().to_string(),
                name: p.display_name().to_string(),
            })
            .collect(),
    )
}

pub async fn get_provider_offices(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OfficesQuery>,
) -> AppResult<Json<Vec<DeliveryOffice>>> {
    let provider = provider_for(&state, &provider)?;
    let offices = provider.get_offices(query.city.as_deref()).await?;
    Ok(Json(offices))
}

pub async fn create_shipment(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<ShipmentRequest>,
) -> AppResult<(StatusCode, Json<ShipmentResponse>)> {
    request.validate()?;
    let provider = provider_for(&state, &provider)?;
    log::info!("📦 Creando envío con {}", provider.display_name());

    let response = provider.create_shipment(&request).await?;
    // Error de negocio del transportista: 422 con la respuesta normalizada
    let status = if response.has_errors() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(response)))
}

pub async fn cancel_shipment(
    State(state): State<AppState>,
    Path((provider, shipment_id)): Path<(String, String)>,
) -> AppResult<Json<CancelShipmentResponse>> {
    let provider = provider_for(&state, &provider)?;
    let success = provider.cancel_shipment(&shipment_id).await;
    Ok(Json(CancelShipmentResponse { success }))
}

pub async fn track_shipment(
    State(state): State<AppState>,
    Path((provider, tracking_number)): Path<(String, String)>,
) -> AppResult<Json<TrackingInfo>> {
    let provider = provider_for(&state, &provider)?;
    Ok(Json(provider.track_shipment(&tracking_number).await?))
}

pub async fn get_label(
    State(state): State<AppState>,
    Path((provider, shipment_id)): Path<(String, String)>,
) -> AppResult<Json<LabelResponse>> {
    let provider = provider_for(&state, &provider)?;
    let url = provider.get_label(&shipment_id).await?;
    Ok(Json(LabelResponse { url }))
}

/// Health check del servicio de envíos
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    log::info!("🏥 Health check delivery");
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "delivery".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state
            .manager
            .providers()
            .iter()
            .map(|p| p.provider().to_string())
            .collect(),
    })
}

