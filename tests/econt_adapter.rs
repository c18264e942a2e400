mod common;

use std::time::Duration;

use delivery_carriers::clients::econt_client::EcontClient;
use delivery_carriers::clients::provider::DeliveryProvider;
use delivery_carriers::config::environment::CarrierSettings;
use delivery_carriers::models::delivery::{DeliveryPoint, TrackingStatus};
use delivery_carriers::utils::errors::DeliveryError;
use serde_json::json;
use wiremock::matchers::{any, basic_auth, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LABEL_PATH: &str = "/services/Shipments/LabelService.createLabel.json";
const STATUS_PATH: &str = "/services/Shipments/ShipmentService.getShipmentStatuses.json";

fn econt(server: &MockServer) -> EcontClient {
    EcontClient::new(
        CarrierSettings::new(format!("{}/services/", server.uri()), "econt-user", "econt-pass"),
        "359",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_office_to_address_quote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LABEL_PATH))
        .and(basic_auth("econt-user", "econt-pass"))
        .and(body_partial_json(json!({
            "mode": "calculate",
            "label": {
                "senderOfficeCode": "A1",
                "receiverAddress": { "city": { "name": "Sofia", "postCode": "1000" } },
                "receiverClient": { "phones": ["359888123456"] },
                "weight": 2.5
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "label": {
                "totalPrice": 7.90,
                "currency": "BGN",
                "sendDate": "2025-03-10",
                "expectedDeliveryDate": "2025-03-11"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = econt(&server)
        .calculate_price(&common::office_to_address(2.5))
        .await
        .unwrap();

    assert_eq!(quote.provider, "econt");
    assert_eq!(quote.price, 7.90);
    assert_eq!(quote.currency, "BGN");
    assert_eq!(quote.delivery_days, 1);
    assert_eq!(quote.errors, None);
}

#[tokio::test]
async fn test_invalid_weight_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = econt(&server);
    for weight in [0.0, -1.0, 100.01] {
        let error = client
            .calculate_price(&common::office_to_address(weight))
            .await
            .unwrap_err();
        assert!(matches!(error, DeliveryError::Validation(_)));
    }
}

#[tokio::test]
async fn test_incomplete_address_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = common::office_to_address(1.0);
    let mut address = common::address("Sofia", "1000");
    address.city = "  ".to_string();
    address.phone = String::new();
    request.to = DeliveryPoint::Address(address);

    let error = econt(&server).calculate_price(&request).await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "Validation error: address is missing required fields: city, phone"
    );
}

#[tokio::test]
async fn test_phone_without_digits_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = common::office_to_address(2.5);
    let mut address = common::address("Sofia", "1000");
    address.phone = "n/a".to_string();
    request.to = DeliveryPoint::Address(address);

    let error = econt(&server).calculate_price(&request).await.unwrap_err();
    assert_eq!(
        error.to_string(),
        "Validation error: address is missing required fields: phone"
    );
}

#[tokio::test]
async fn test_business_error_becomes_failed_quote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LABEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "ExInvalidParam",
            "message": "Invalid receiver city",
            "innerErrors": [{ "message": "Post code does not match city" }]
        })))
        .mount(&server)
        .await;

    let quote = econt(&server)
        .calculate_price(&common::office_to_address(1.0))
        .await
        .unwrap();

    assert!(quote.has_errors());
    assert_eq!(quote.price, 0.0);
    assert_eq!(
        quote.errors.unwrap(),
        vec!["Invalid receiver city".to_string(), "Post code does not match city".to_string()]
    );
}

#[tokio::test]
async fn test_http_error_carries_carrier_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;

    let error = econt(&server)
        .calculate_price(&common::office_to_address(1.0))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Econt API Error: HTTP 401: Bad credentials");
}

#[tokio::test]
async fn test_create_shipment_to_office() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LABEL_PATH))
        .and(body_partial_json(json!({
            "mode": "create",
            "label": {
                "receiverOfficeCode": "1127",
                "senderClient": { "name": "Ivan Petrov", "phones": ["359888123456"] },
                "senderAddress": { "city": { "name": "Plovdiv", "postCode": "4000" } },
                "packCount": 1,
                "services": { "cdAmount": 49.90, "cdType": "get" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "label": {
                "shipmentNumber": "1051234567",
                "totalPrice": 9.40,
                "currency": "BGN",
                "expectedDeliveryDate": "2025-03-12",
                "pdfURL": "https://ee.econt.com/pdf/1051234567.pdf"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let shipment = econt(&server)
        .create_shipment(&common::shipment_to_office("1127"))
        .await
        .unwrap();

    assert!(!shipment.has_errors());
    assert_eq!(shipment.shipment_id, "1051234567");
    assert_eq!(shipment.tracking_number, "1051234567");
    assert_eq!(shipment.label_url.as_deref(), Some("https://ee.econt.com/pdf/1051234567.pdf"));
    assert_eq!(shipment.price, 9.40);
}

#[tokio::test]
async fn test_offices_filtered_by_city() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/Nomenclatures/NomenclaturesService.getOffices.json"))
        .and(body_partial_json(json!({ "countryCode": "BGR" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offices": [
                {
                    "code": "1127",
                    "name": "София Център",
                    "nameEn": "Sofia Center",
                    "phones": ["+359 2 123 456"],
                    "address": {
                        "city": { "name": "София", "nameEn": "Sofia", "postCode": "1000" },
                        "fullAddressEn": "5 Pirotska St",
                        "location": { "latitude": 42.7, "longitude": 23.32 }
                    },
                    "normalBusinessHoursFrom": "08:30",
                    "normalBusinessHoursTo": "19:00"
                },
                {
                    "code": "4000",
                    "name": "Пловдив",
                    "address": { "city": { "name": "Пловдив", "nameEn": "Plovdiv", "postCode": "4000" } }
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = econt(&server);
    let all = client.get_offices(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].name, "Пловдив");

    let sofia = client.search_offices("sofia").await.unwrap();
    assert_eq!(sofia.len(), 1);
    assert_eq!(sofia[0].id, "1127");
    assert_eq!(sofia[0].name, "Sofia Center");
    assert_eq!(sofia[0].working_hours.as_deref(), Some("08:30 - 19:00"));

    assert!(client.get_offices(Some("Varna")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_office_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "offices": [] })))
        .mount(&server)
        .await;

    assert!(econt(&server).get_offices(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tracking_events_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .and(body_partial_json(json!({ "shipmentNumbers": ["1051234567"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shipmentStatuses": [{
                "status": {
                    "shipmentNumber": "1051234567",
                    "shortDeliveryStatus": "Доставена",
                    "shortDeliveryStatusEn": "Delivered",
                    "deliveryTime": "2025-03-11T14:05:00+02:00",
                    "trackingEvents": [
                        { "destinationType": "prepared", "destinationDetailsEn": "Label created", "time": "2025-03-10T09:00:00+02:00" },
                        { "destinationType": "office", "destinationDetailsEn": "Accepted in office", "officeName": "Plovdiv", "time": "2025-03-10T17:00:00+02:00" },
                        { "destinationType": "client", "destinationDetailsEn": "Delivered to client", "cityName": "Sofia", "time": "2025-03-11T14:05:00+02:00" }
                    ]
                }
            }]
        })))
        .mount(&server)
        .await;

    let info = econt(&server).track_shipment("1051234567").await.unwrap();

    assert_eq!(info.status, TrackingStatus::Delivered);
    assert_eq!(info.status_description, "Delivered");
    assert_eq!(info.events.len(), 3);
    assert_eq!(info.events[0].description, "Delivered to client");
    assert_eq!(info.events[0].location.as_deref(), Some("Sofia"));
    assert_eq!(info.events[2].description, "Label created");
    assert!(info.events[0].timestamp > info.events[1].timestamp);
    assert_eq!(info.last_update, info.events[0].timestamp);
    assert!(info.actual_delivery.is_some());
}

#[tokio::test]
async fn test_label_is_hosted_pdf_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shipmentStatuses": [{
                "status": {
                    "shipmentNumber": "1051234567",
                    "pdfURL": "https://ee.econt.com/pdf/1051234567.pdf"
                }
            }]
        })))
        .mount(&server)
        .await;

    let url = econt(&server).get_label("1051234567").await.unwrap();
    assert_eq!(url, "https://ee.econt.com/pdf/1051234567.pdf");
}

#[tokio::test]
async fn test_cancel_is_best_effort() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/Shipments/LabelService.deleteLabels.json"))
        .and(body_partial_json(json!({ "shipmentNumbers": ["1051234567"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "shipmentNum": "1051234567" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/Shipments/LabelService.deleteLabels.json"))
        .and(body_partial_json(json!({ "shipmentNumbers": ["999"] })))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = econt(&server);
    assert!(client.cancel_shipment("1051234567").await);
    assert!(!client.cancel_shipment("999").await);
}
