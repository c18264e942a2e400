//! Routes module
//! 
//! Routers de Axum agrupados por recurso.

pub mod delivery_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub use delivery_routes::create_delivery_router;

/// Aplicación completa: rutas, trazas HTTP y CORS
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    Router::new()
        .nest("/api/delivery", create_delivery_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
