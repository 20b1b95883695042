use crate::config::MetronomeSettings;
use crate::core::credits::{credits_to_cents, dollars_to_cents};
use crate::domain::model::{
    BalanceSnapshot, Contract, Customer, PurchaseOrder, RecordedUsage, UsageEvent,
};
use crate::domain::ports::Metering;
use crate::utils::error::{Result, VocalisError};
use crate::utils::validation::validate_url;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const PREPAID_PRODUCT_NAME: &str = "Vocalis Credits";
const CONTRACT_NAME: &str = "Vocalis Credit Contract";

/// Bearer-auth JSON client for the Metronome billing API.
pub struct MetronomeClient {
    base_url: Url,
    api_key: String,
    rate_card_name: String,
    client: Client,
}

impl MetronomeClient {
    pub fn new(settings: &MetronomeSettings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(VocalisError::MissingConfigError {
                field: "metronome.api_key".to_string(),
            });
        }
        validate_url("metronome.api_url", &settings.api_url)?;

        let base_url = Url::parse(&settings.api_url)?;
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        tracing::debug!("MetronomeClient initialized with base_url: {}", base_url);

        Ok(Self {
            base_url,
            api_key: settings.api_key.clone(),
            rate_card_name: settings.rate_card_name.clone(),
            client,
        })
    }

    async fn request(&self, method: Method, path: &str, payload: Option<&Value>) -> Result<Value> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;

        tracing::debug!("📡 Metronome {} {}", method, path);

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");
        if let Some(payload) = payload {
            tracing::debug!("📡 Request payload: {}", payload);
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("❌ Metronome API error: {} - {}", status, detail);
            return Err(VocalisError::MeteringApi {
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = response.json().await?;
        tracing::debug!("📡 Response status: {}", status);
        Ok(body)
    }

    fn id_from_data(body: &Value, what: &str) -> Result<String> {
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| VocalisError::UnexpectedResponse {
                detail: format!("No {what} id returned from Metronome"),
            })
    }
}

#[async_trait]
impl Metering for MetronomeClient {
    async fn create_customer(&self, name: &str, email: &str) -> Result<Customer> {
        tracing::info!("Creating Metronome customer: {}", name);

        // Email travels inside the ingest alias so webhooks can resolve it later.
        let external_id = format!("vocalis_{email}");
        let payload = json!({
            "name": name,
            "ingest_aliases": [external_id],
        });

        let body = self.request(Method::POST, "/v1/customers", Some(&payload)).await?;
        let customer_id = Self::id_from_data(&body, "customer")?;

        tracing::info!("✅ Customer created successfully: {}", customer_id);

        Ok(Customer {
            id: customer_id,
            external_id: external_id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            ingest_aliases: vec![external_id],
        })
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Value> {
        let body = self
            .request(Method::GET, &format!("/v1/customers/{customer_id}"), None)
            .await?;
        Ok(body["data"].clone())
    }

    async fn set_customer_aliases(&self, customer_id: &str, aliases: &[String]) -> Result<()> {
        let payload = json!({ "ingest_aliases": aliases });
        self.request(
            Method::POST,
            &format!("/v1/customers/{customer_id}/setIngestAliases"),
            Some(&payload),
        )
        .await?;
        tracing::info!("✅ Customer aliases set for {}", customer_id);
        Ok(())
    }

    async fn get_rate_card(&self, rate_card_name: &str) -> Result<Option<String>> {
        tracing::debug!("Looking for '{}' rate card...", rate_card_name);

        let body = self
            .request(
                Method::POST,
                "/v1/contract-pricing/rate-cards/list",
                Some(&json!({})),
            )
            .await?;

        let cards = body["data"].as_array().cloned().unwrap_or_default();
        for card in &cards {
            if card["name"].as_str() == Some(rate_card_name) {
                let id = card["id"].as_str().map(str::to_string);
                tracing::debug!("✅ Found '{}' rate card: {:?}", rate_card_name, id);
                return Ok(id);
            }
        }

        tracing::warn!("❌ '{}' rate card not found", rate_card_name);
        Ok(None)
    }

    async fn find_prepaid_product(&self) -> Result<Option<String>> {
        let body = self
            .request(
                Method::POST,
                "/v1/contract-pricing/products/list",
                Some(&json!({})),
            )
            .await?;

        let products = body["data"].as_array().cloned().unwrap_or_default();
        for product in &products {
            if product["current"]["name"].as_str() == Some(PREPAID_PRODUCT_NAME) {
                return Ok(product["id"].as_str().map(str::to_string));
            }
        }
        Ok(None)
    }

    async fn get_or_create_prepaid_product(&self) -> Result<String> {
        if let Some(id) = self.find_prepaid_product().await? {
            tracing::debug!("Found '{}' product: {}", PREPAID_PRODUCT_NAME, id);
            return Ok(id);
        }

        let payload = json!({
            "name": PREPAID_PRODUCT_NAME,
            "type": "fixed",
        });
        let body = self
            .request(
                Method::POST,
                "/v1/contract-pricing/products/create",
                Some(&payload),
            )
            .await?;
        let product_id = Self::id_from_data(&body, "product")?;

        tracing::info!("✅ Created '{}' product: {}", PREPAID_PRODUCT_NAME, product_id);
        Ok(product_id)
    }

    async fn create_billing_contract(
        &self,
        customer_id: &str,
        order: &PurchaseOrder,
    ) -> Result<Contract> {
        tracing::info!("Creating billing contract for customer {}", customer_id);

        let rate_card_id = self
            .get_rate_card(&self.rate_card_name)
            .await?
            .ok_or_else(|| VocalisError::ConfigError {
                message: format!(
                    "'{}' rate card not found - create it in the Metronome dashboard first",
                    self.rate_card_name
                ),
            })?;

        let starting_at = Utc::now().format("%Y-%m-%dT00:00:00.000Z").to_string();
        let mut payload = json!({
            "customer_id": customer_id,
            "rate_card_id": rate_card_id,
            "starting_at": starting_at,
            "name": CONTRACT_NAME,
        });

        let auto_recharge_enabled = order
            .auto_recharge
            .as_ref()
            .map(|ar| ar.enabled)
            .unwrap_or(false);

        if let Some(recharge) = order.auto_recharge.as_ref().filter(|ar| ar.enabled) {
            let product_id = self.get_or_create_prepaid_product().await?;

            let threshold_cents = credits_to_cents(recharge.threshold);
            let recharge_cents = dollars_to_cents(recharge.price);

            payload["prepaid_balance_threshold_configuration"] = json!({
                "commit": {
                    "product_id": product_id,
                    "name": "Vocalis Credits Purchase",
                    "description": "Auto-recharge for voice generation credits",
                },
                "is_enabled": true,
                "payment_gate_config": {
                    "payment_gate_type": "EXTERNAL",
                },
                "threshold_amount": threshold_cents,
                "recharge_to_amount": recharge_cents,
            });

            tracing::info!(
                "Threshold: ${:.2}, recharge to: ${:.2}",
                threshold_cents as f64 / 100.0,
                recharge_cents as f64 / 100.0
            );
        }

        let body = self
            .request(Method::POST, "/v1/contracts/create", Some(&payload))
            .await?;
        let contract_id = Self::id_from_data(&body, "contract")?;

        tracing::info!(
            "✅ Contract created {}: {}",
            if auto_recharge_enabled {
                "with auto-recharge"
            } else {
                "basic"
            },
            contract_id
        );

        Ok(Contract {
            id: contract_id,
            customer_id: customer_id.to_string(),
            rate_card_id,
            auto_recharge_enabled,
        })
    }

    async fn get_customer_balance(&self, customer_id: &str) -> Result<BalanceSnapshot> {
        let body = self
            .request(
                Method::GET,
                &format!("/v1/customers/{customer_id}/balance"),
                None,
            )
            .await?;

        let balance = body["data"]["remaining_credits"].as_u64().unwrap_or(0);

        Ok(BalanceSnapshot {
            customer_id: customer_id.to_string(),
            balance,
            currency: "USD".to_string(),
            last_updated: Utc::now(),
        })
    }

    async fn record_usage_event(&self, event: &UsageEvent) -> Result<RecordedUsage> {
        tracing::info!(
            "Recording usage event for customer {}: {}",
            event.customer_id,
            event.event_name
        );

        let payload = json!({
            "customer_id": event.customer_id,
            "event_name": event.event_name,
            "timestamp": event.timestamp.to_rfc3339(),
            "properties": {
                "credits_consumed": event.properties.credits_consumed,
                "voice_type": event.properties.voice_type,
                "voice_name": event.properties.voice_name,
                "character_count": event.properties.character_count,
            },
        });

        let body = self
            .request(Method::POST, "/v1/usage/events", Some(&payload))
            .await?;

        tracing::info!(
            "✅ Usage event recorded: {} credits",
            event.properties.credits_consumed
        );

        Ok(RecordedUsage {
            event_id: body["data"]["id"].as_str().map(str::to_string),
            credits_consumed: event.properties.credits_consumed,
        })
    }
}
