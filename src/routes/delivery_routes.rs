//! Rutas de envíos
//! 
//! Se montan bajo `/api/delivery`.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::controllers::delivery_controller;
use crate::state::AppState;

/// Crear el router de envíos
pub fn create_delivery_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(delivery_controller::health_check))
        .route("/providers", get(delivery_controller::list_providers))
        .route("/offices", get(delivery_controller::get_all_offices))
        .route("/offices/search", get(delivery_controller::search_offices))
        .route("/calculate", post(delivery_controller::calculate_prices))
        .route("/cheapest", post(delivery_controller::cheapest_option))
        .route("/fastest", post(delivery_controller::fastest_option))
        .route("/:provider/offices", get(delivery_controller::get_provider_offices))
        .route("/:provider/shipments", post(delivery_controller::create_shipment))
        .route("/:provider/shipments/:id", delete(delivery_controller::cancel_shipment))
        .route("/:provider/tracking/:number", get(delivery_controller::track_shipment))
        .route("/:provider/labels/:id", get(delivery_controller::get_label))
}
