//! Gestor de transportistas
//!
//! Mantiene el registro de adaptadores y reparte las operaciones agregadas
//! (oficinas, precios) entre todos ellos en paralelo. El fallo de un
//! transportista nunca tumba la operación completa.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::clients::econt_client::EcontClient;
use crate::clients::provider::DeliveryProvider;
use crate::clients::speedy_client::SpeedyClient;
use crate::config::environment::DeliveryConfig;
use crate::models::delivery::{DeliveryCalculationRequest, DeliveryCalculationResponse, DeliveryOffice};
use crate::utils::errors::{DeliveryError, DeliveryResult};

pub struct DeliveryManager {
    providers: Vec<Arc<dyn DeliveryProvider>>,
    carrier_timeout: Duration,
}

impl DeliveryManager {
    pub fn new(carrier_timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            carrier_timeout,
        }
    }

    /// Registrar todos los transportistas conocidos a partir de la configuración
    pub fn from_config(config: &DeliveryConfig) -> DeliveryResult<Self> {
        let mut manager = Self::new(config.carrier_timeout);
        manager.register(Arc::new(SpeedyClient::new(
            config.speedy.clone(),
            &config.phone_calling_code,
            config.request_timeout,
        )?));
        manager.register(Arc::new(EcontClient::new(
            config.econt.clone(),
            &config.phone_calling_code,
            config.request_timeout,
        )?));

        for (name, settings) in [("Speedy", &config.speedy), ("Econt", &config.econt)] {
            if !settings.available {
                log::warn!("⚠️ {} registrado pero marcado como no disponible", name);
            }
        }
        log::info!("🚚 DeliveryManager inicializado con {} transportistas", manager.providers.len());
        Ok(manager)
    }

    /// Añadir un transportista; el orden de registro es el orden de los resultados.
    /// Un tag repetido reemplaza al adaptador anterior en su misma posición.
    pub fn register(&mut self, provider: Arc<dyn DeliveryProvider>) {
        match self.providers.iter().position(|p| p.provider() == provider.provider()) {
            Some(index) => self.providers[index] = provider,
            None => self.providers.push(provider),
        }
    }

    pub fn get_provider(&self, tag: &str) -> Option<Arc<dyn DeliveryProvider>> {
        self.providers
            .iter()
            .find(|p| p.provider().eq_ignore_ascii_case(tag.trim()))
            .cloned()
    }

    pub fn providers(&self) -> &[Arc<dyn DeliveryProvider>] {
        &self.providers
    }

    pub fn carrier_timeout(&self) -> Duration {
        self.carrier_timeout
    }

    /// Esperar una operación de un transportista con el límite del gestor
    async fn bounded<T, F>(&self, provider: &dyn DeliveryProvider, future: F) -> DeliveryResult<T>
    where
        F: std::future::Future<Output = DeliveryResult<T>>,
    {
        match tokio::time::timeout(self.carrier_timeout, future).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout {
                provider: provider.display_name().to_string(),
                timeout: self.carrier_timeout,
            }),
        }
    }

    /// Oficinas de todos los transportistas; los que fallan aportan cero oficinas
    pub async fn get_all_offices(&self, city: Option<&str>) -> Vec<DeliveryOffice> {
        log::info!("🏢 Consultando oficinas en {} transportistas", self.providers.len());
        let futures = self
            .providers
            .iter()
            .map(|provider| self.bounded(provider.as_ref(), provider.get_offices(city)));
        self.collect_offices(join_all(futures).await)
    }

    pub async fn search_all_offices(&self, query: &str) -> Vec<DeliveryOffice> {
        log::info!("🔍 Buscando oficinas '{}' en {} transportistas", query, self.providers.len());
        let futures = self
            .providers
            .iter()
            .map(|provider| self.bounded(provider.as_ref(), provider.search_offices(query)));
        self.collect_offices(join_all(futures).await)
    }

    fn collect_offices(&self, results: Vec<DeliveryResult<Vec<DeliveryOffice>>>) -> Vec<DeliveryOffice> {
        let mut offices = Vec::new();
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(mut found) => offices.append(&mut found),
                Err(e) => log::warn!("⚠️ {}: sin oficinas ({})", provider.display_name(), e),
            }
        }
        offices
    }

    /// Precio de cada transportista registrado, en orden de registro.
    ///
    /// Siempre devuelve una entrada por transportista: los que fallan o no
    /// responden a tiempo aparecen con `errors` y precio 0.
    pub async fn calculate_all_prices(
        &self,
        request: &DeliveryCalculationRequest,
    ) -> Vec<DeliveryCalculationResponse> {
        log::info!("💰 Calculando precio en {} transportistas", self.providers.len());
        let futures = self
            .providers
            .iter()
            .map(|provider| self.bounded(provider.as_ref(), provider.calculate_price(request)));
        let results = join_all(futures).await;

        let responses: Vec<DeliveryCalculationResponse> = self
            .providers
            .iter()
            .zip(results)
            .map(|(provider, result)| match result {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("⚠️ {}: cálculo fallido ({})", provider.display_name(), e);
                    DeliveryCalculationResponse::failed(provider.provider(), vec![e.to_string()])
                }
            })
            .collect();

        let successful = responses.iter().filter(|r| !r.has_errors()).count();
        log::info!("✅ {}/{} transportistas con precio", successful, responses.len());
        responses
    }

    pub async fn get_cheapest_option(&self, request: &DeliveryCalculationRequest) -> Option<DeliveryCalculationResponse> {
        cheapest(&self.calculate_all_prices(request).await).cloned()
    }

    pub async fn get_fastest_option(&self, request: &DeliveryCalculationRequest) -> Option<DeliveryCalculationResponse> {
        fastest(&self.calculate_all_prices(request).await).cloned()
    }
}

/// Opción sin errores de menor precio; en empate gana la primera
pub fn cheapest(options: &[DeliveryCalculationResponse]) -> Option<&DeliveryCalculationResponse> {
    options
        .iter()
        .filter(|option| !option.has_errors())
        .fold(None, |best: Option<&DeliveryCalculationResponse>, option| match best {
            Some(current) if current.price <= option.price => Some(current),
            _ => Some(option),
        })
}

/// Opción sin errores con menos días de entrega; en empate gana la primera
pub fn fastest(options: &[DeliveryCalculationResponse]) -> Option<&DeliveryCalculationResponse> {
    options
        .iter()
        .filter(|option| !option.has_errors())
        .fold(None, |best: Option<&DeliveryCalculationResponse>, option| match best {
            Some(current) if current.delivery_days <= option.delivery_days => Some(current),
            _ => Some(option),
        })
}
