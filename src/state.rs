//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::DeliveryConfig;
use crate::services::delivery_manager::DeliveryManager;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<DeliveryManager>,
    pub config: Arc<DeliveryConfig>,
}

impl AppState {
    pub fn new(manager: DeliveryManager, config: DeliveryConfig) -> Self {
        Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
        }
    }
}
