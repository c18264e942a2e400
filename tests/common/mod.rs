#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use delivery_carriers::clients::provider::DeliveryProvider;
use delivery_carriers::config::environment::DeliveryConfig;
use delivery_carriers::models::delivery::*;
use delivery_carriers::utils::errors::{DeliveryError, DeliveryResult};

pub fn address(city: &str, zip: &str) -> DeliveryAddress {
    DeliveryAddress {
        first_name: "Ivan".to_string(),
        last_name: "Petrov".to_string(),
        phone: "0888 123 456".to_string(),
        email: Some("ivan@example.com".to_string()),
        company: None,
        address1: "bul. Vitosha 10".to_string(),
        address2: None,
        city: city.to_string(),
        province: None,
        province_code: None,
        zip: zip.to_string(),
        country: "Bulgaria".to_string(),
        country_code: Some("BG".to_string()),
    }
}

pub fn office_to_address(weight: f64) -> DeliveryCalculationRequest {
    DeliveryCalculationRequest {
        from: DeliveryPoint::office("A1"),
        to: DeliveryPoint::Address(address("Sofia", "1000")),
        weight,
        dimensions: None,
        declared_value: None,
        cod_amount: None,
        return_documents: None,
        return_shipment: None,
    }
}

pub fn shipment_to_office(office_id: &str) -> ShipmentRequest {
    ShipmentRequest {
        sender: address("Plovdiv", "4000"),
        recipient: DeliveryPoint::office(office_id),
        weight: 2.5,
        dimensions: Some(Dimensions {
            length: 30.0,
            width: 20.0,
            height: 10.0,
        }),
        declared_value: None,
        cod_amount: Some(49.90),
        contents: "Books".to_string(),
        pack_count: None,
        return_documents: None,
        return_shipment: None,
        notes: Some("ORDER-1001".to_string()),
    }
}

pub fn test_config() -> DeliveryConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SPEEDY_API_URL", "http://127.0.0.1:9/speedy"),
        ("SPEEDY_USERNAME", "speedy-user"),
        ("SPEEDY_PASSWORD", "speedy-pass"),
        ("ECONT_API_URL", "http://127.0.0.1:9/econt"),
        ("ECONT_USERNAME", "econt-user"),
        ("ECONT_PASSWORD", "econt-pass"),
    ]);
    DeliveryConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

/// Comportamiento programado de un transportista falso
#[derive(Clone)]
pub enum Behavior {
    Quote { price: f64, days: u32 },
    Fail(String),
    Unavailable,
    Hang,
    /// Responde bien tras esperar `delay`
    Slow { price: f64, days: u32, delay: Duration },
}

pub struct MockProvider {
    pub tag: &'static str,
    pub behavior: Behavior,
}

impl MockProvider {
    pub fn new(tag: &'static str, behavior: Behavior) -> Self {
        Self { tag, behavior }
    }

    async fn act<T>(&self, ok: impl FnOnce() -> T) -> DeliveryResult<T> {
        match &self.behavior {
            Behavior::Quote { .. } => Ok(ok()),
            Behavior::Fail(message) => Err(DeliveryError::api(self.tag, message.clone())),
            Behavior::Unavailable => Err(DeliveryError::Unavailable {
                provider: self.tag.to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(ok())
            }
            Behavior::Slow { delay, .. } => {
                tokio::time::sleep(*delay).await;
                Ok(ok())
            }
        }
    }

    fn office(&self) -> DeliveryOffice {
        DeliveryOffice {
            id: "1".to_string(),
            name: format!("{} Sofia Center", self.tag),
            address: "1 Vitosha Blvd".to_string(),
            city: "Sofia".to_string(),
            zip: "1000".to_string(),
            phone: None,
            working_hours: None,
            latitude: None,
            longitude: None,
            provider: self.tag.to_string(),
        }
    }
}

#[async_trait]
impl DeliveryProvider for MockProvider {
    fn provider(&self) -> &str {
        self.tag
    }

    fn display_name(&self) -> &str {
        self.tag
    }

    async fn get_offices(&self, _city: Option<&str>) -> DeliveryResult<Vec<DeliveryOffice>> {
        self.act(|| vec![self.office()]).await
    }

    async fn calculate_price(
        &self,
        _request: &DeliveryCalculationRequest,
    ) -> DeliveryResult<DeliveryCalculationResponse> {
        let (price, days) = match self.behavior {
            Behavior::Quote { price, days } | Behavior::Slow { price, days, .. } => (price, days),
            _ => (0.0, 0),
        };
        self.act(|| DeliveryCalculationResponse {
            provider: self.tag.to_string(),
            service_name: "Standard".to_string(),
            price,
            currency: "BGN".to_string(),
            delivery_days: days,
            errors: None,
        })
        .await
    }

    async fn create_shipment(&self, _request: &ShipmentRequest) -> DeliveryResult<ShipmentResponse> {
        self.act(|| ShipmentResponse {
            provider: self.tag.to_string(),
            shipment_id: "SHP-1".to_string(),
            tracking_number: "TRK-1".to_string(),
            label_url: Some("https://labels.example/SHP-1.pdf".to_string()),
            estimated_delivery_date: None,
            price: 5.0,
            currency: "BGN".to_string(),
            errors: None,
        })
        .await
    }

    async fn cancel_shipment(&self, _shipment_id: &str) -> bool {
        self.act(|| ()).await.is_ok()
    }

    async fn track_shipment(&self, tracking_number: &str) -> DeliveryResult<TrackingInfo> {
        let tracking_number = tracking_number.to_string();
        self.act(move || TrackingInfo {
            provider: self.tag.to_string(),
            tracking_number,
            status: TrackingStatus::Pending,
            status_description: String::new(),
            last_update: chrono::Utc::now(),
            events: Vec::new(),
            estimated_delivery: None,
            actual_delivery: None,
        })
        .await
    }

    async fn get_label(&self, shipment_id: &str) -> DeliveryResult<String> {
        let url = format!("https://labels.example/{}.pdf", shipment_id);
        self.act(move || url).await
    }
}
