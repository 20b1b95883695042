use httpmock::prelude::*;
use serde_json::json;
use vocalis::config::MetronomeSettings;
use vocalis::domain::model::{AutoRechargeConfig, PurchaseOrder, UsageEvent, UsageProperties, VoiceType};
use vocalis::domain::ports::Metering;
use vocalis::{MetronomeClient, VocalisError};

fn client_for(server: &MockServer) -> MetronomeClient {
    let settings = MetronomeSettings {
        api_key: "mk_test".to_string(),
        api_url: server.base_url(),
        ..MetronomeSettings::default()
    };
    MetronomeClient::new(&settings).unwrap()
}

#[test]
fn test_client_requires_api_key() {
    let settings = MetronomeSettings::default();
    assert!(matches!(
        MetronomeClient::new(&settings),
        Err(VocalisError::MissingConfigError { .. })
    ));
}

#[tokio::test]
async fn test_create_customer_sends_alias_and_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/customers")
            .header("authorization", "Bearer mk_test")
            .json_body_partial(
                r#"{"name": "Alex Chen", "ingest_aliases": ["vocalis_alex@example.com"]}"#,
            );
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "cus_123"}}));
    });

    let client = client_for(&server);
    let customer = client
        .create_customer("Alex Chen", "alex@example.com")
        .await
        .unwrap();

    mock.assert();
    assert_eq!(customer.id, "cus_123");
    assert_eq!(customer.external_id, "vocalis_alex@example.com");
    assert_eq!(customer.email, "alex@example.com");
    assert_eq!(customer.ingest_aliases, vec!["vocalis_alex@example.com"]);
}

#[tokio::test]
async fn test_create_customer_without_id_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/customers");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {}}));
    });

    let client = client_for(&server);
    let err = client.create_customer("Alex Chen", "alex@example.com").await;
    assert!(matches!(err, Err(VocalisError::UnexpectedResponse { .. })));
}

#[tokio::test]
async fn test_get_rate_card_matches_by_name() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/rate-cards/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": [
                {"id": "rc_old", "name": "Vocalis 2024"},
                {"id": "rc_current", "name": "Vocalis 2025"},
            ]}));
    });

    let client = client_for(&server);
    assert_eq!(
        client.get_rate_card("Vocalis 2025").await.unwrap(),
        Some("rc_current".to_string())
    );
    assert_eq!(client.get_rate_card("Vocalis 2030").await.unwrap(), None);

    mock.assert_hits(2);
}

#[tokio::test]
async fn test_contract_with_auto_recharge_converts_to_cents() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/rate-cards/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": [{"id": "rc_1", "name": "Vocalis 2025"}]}));
    });
    // no existing product -> create
    server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/products/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": []}));
    });
    let product_create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/contract-pricing/products/create")
            .json_body_partial(r#"{"name": "Vocalis Credits", "type": "fixed"}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "prod_1"}}));
    });
    // 25 000 credits threshold = 625 cents; $50 recharge = 5 000 cents
    let contract_create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/contracts/create")
            .json_body_partial(
                r#"{
                    "customer_id": "cus_1",
                    "rate_card_id": "rc_1",
                    "prepaid_balance_threshold_configuration": {
                        "is_enabled": true,
                        "threshold_amount": 625,
                        "recharge_to_amount": 5000,
                        "payment_gate_config": {"payment_gate_type": "EXTERNAL"}
                    }
                }"#,
            );
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "con_1"}}));
    });

    let client = client_for(&server);
    let order = PurchaseOrder {
        credits: 200_000,
        amount: 50.0,
        auto_recharge: Some(AutoRechargeConfig {
            enabled: true,
            threshold: 25_000,
            amount: 200_000,
            price: 50.0,
        }),
    };

    let contract = client.create_billing_contract("cus_1", &order).await.unwrap();

    product_create.assert();
    contract_create.assert();
    assert_eq!(contract.id, "con_1");
    assert_eq!(contract.rate_card_id, "rc_1");
    assert!(contract.auto_recharge_enabled);
}

#[tokio::test]
async fn test_basic_contract_skips_product_setup() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/rate-cards/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": [{"id": "rc_1", "name": "Vocalis 2025"}]}));
    });
    let product_list = server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/products/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": []}));
    });
    let contract_create = server.mock(|when, then| {
        when.method(POST).path("/v1/contracts/create");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "con_2"}}));
    });

    let client = client_for(&server);
    let order = PurchaseOrder {
        credits: 20_000,
        amount: 5.0,
        auto_recharge: None,
    };

    let contract = client.create_billing_contract("cus_1", &order).await.unwrap();

    contract_create.assert();
    product_list.assert_hits(0);
    assert!(!contract.auto_recharge_enabled);
}

#[tokio::test]
async fn test_missing_rate_card_fails_contract_creation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/contract-pricing/rate-cards/list");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": []}));
    });

    let client = client_for(&server);
    let order = PurchaseOrder {
        credits: 20_000,
        amount: 5.0,
        auto_recharge: None,
    };

    let err = client.create_billing_contract("cus_1", &order).await;
    assert!(matches!(err, Err(VocalisError::ConfigError { .. })));
}

#[tokio::test]
async fn test_balance_lookup() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1/balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"remaining_credits": 4200}}));
    });

    let client = client_for(&server);
    let snapshot = client.get_customer_balance("cus_1").await.unwrap();

    mock.assert();
    assert_eq!(snapshot.customer_id, "cus_1");
    assert_eq!(snapshot.balance, 4200);
    assert_eq!(snapshot.currency, "USD");
}

#[tokio::test]
async fn test_balance_defaults_to_zero_on_missing_field() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1/balance");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {}}));
    });

    let client = client_for(&server);
    let snapshot = client.get_customer_balance("cus_1").await.unwrap();
    assert_eq!(snapshot.balance, 0);
}

#[tokio::test]
async fn test_record_usage_event_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/usage/events")
            .json_body_partial(
                r#"{
                    "customer_id": "cus_1",
                    "event_name": "voice_generation",
                    "properties": {
                        "voice_type": "premium",
                        "voice_name": "Aria",
                        "character_count": 1000,
                        "credits_consumed": 2000
                    }
                }"#,
            );
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "evt_1"}}));
    });

    let client = client_for(&server);
    let event = UsageEvent {
        customer_id: "cus_1".to_string(),
        event_name: "voice_generation".to_string(),
        timestamp: chrono::Utc::now(),
        properties: UsageProperties {
            voice_type: VoiceType::Premium,
            voice_name: "Aria".to_string(),
            character_count: 1000,
            credits_consumed: 2000,
        },
    };

    let recorded = client.record_usage_event(&event).await.unwrap();

    mock.assert();
    assert_eq!(recorded.event_id.as_deref(), Some("evt_1"));
    assert_eq!(recorded.credits_consumed, 2000);
}

#[tokio::test]
async fn test_set_customer_aliases() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/customers/cus_1/setIngestAliases")
            .json_body_partial(r#"{"ingest_aliases": ["vocalis_alex@example.com"]}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {}}));
    });

    let client = client_for(&server);
    client
        .set_customer_aliases("cus_1", &["vocalis_alex@example.com".to_string()])
        .await
        .unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_get_customer_unwraps_data_envelope() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": {"id": "cus_1", "name": "Alex Chen"}}));
    });

    let client = client_for(&server);
    let customer = client.get_customer("cus_1").await.unwrap();
    assert_eq!(customer["id"], "cus_1");
    assert_eq!(customer["name"], "Alex Chen");
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1/balance");
        then.status(500).body("internal provider error");
    });

    let client = client_for(&server);
    let err = client.get_customer_balance("cus_1").await;

    match err {
        Err(VocalisError::MeteringApi { status, detail }) => {
            assert_eq!(status, 500);
            assert!(detail.contains("internal provider error"));
        }
        other => panic!("expected MeteringApi error, got {other:?}"),
    }
}
