//! Interfaz común de los transportistas

use async_trait::async_trait;

use crate::models::delivery::{
    DeliveryCalculationRequest, DeliveryCalculationResponse, DeliveryOffice, ShipmentRequest,
    ShipmentResponse, TrackingInfo,
};
use crate::utils::errors::DeliveryResult;

/// Capacidades que todo adaptador de transportista debe implementar.
///
/// Los errores de transporte y validación se devuelven como `Err`; los
/// errores de negocio del transportista viajan en el campo `errors` de la
/// respuesta.
#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    /// Etiqueta del transportista en las respuestas (`"speedy"`, `"econt"`)
    fn provider(&self) -> &str;

    /// Nombre legible usado como prefijo de los errores
    fn display_name(&self) -> &str;

    /// Oficinas del transportista, opcionalmente filtradas por ciudad
    async fn get_offices(&self, city: Option<&str>) -> DeliveryResult<Vec<DeliveryOffice>>;

    /// Búsqueda de oficinas por nombre de ciudad
    async fn search_offices(&self, query: &str) -> DeliveryResult<Vec<DeliveryOffice>> {
        self.get_offices(Some(query)).await
    }

    async fn calculate_price(
        &self,
        request: &DeliveryCalculationRequest,
    ) -> DeliveryResult<DeliveryCalculationResponse>;

    async fn create_shipment(&self, request: &ShipmentRequest) -> DeliveryResult<ShipmentResponse>;

    /// Cancelación de mejor esfuerzo: nunca falla, cualquier error se
    /// registra en el log y se devuelve `false`
    async fn cancel_shipment(&self, shipment_id: &str) -> bool;

    async fn track_shipment(&self, tracking_number: &str) -> DeliveryResult<TrackingInfo>;

    /// URL de la etiqueta imprimible del envío
    async fn get_label(&self, shipment_id: &str) -> DeliveryResult<String>;
}
