use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer record as returned by the metering provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub ingest_aliases: Vec<String>,
}

/// Point-in-time credit balance for one customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub customer_id: String,
    pub balance: u64,
    pub currency: String,
    pub last_updated: DateTime<Utc>,
}

/// Auto-recharge settings attached to a credit purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRechargeConfig {
    pub enabled: bool,
    /// Balance (in credits) below which a recharge triggers.
    pub threshold: u64,
    /// Credits added per recharge.
    pub amount: u64,
    /// Dollar price of one recharge.
    pub price: f64,
}

/// A credit purchase about to become a billing contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub credits: u64,
    pub amount: f64,
    pub auto_recharge: Option<AutoRechargeConfig>,
}

/// Billing contract created at the metering provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub customer_id: String,
    pub rate_card_id: String,
    pub auto_recharge_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceType {
    Standard,
    Premium,
}

impl VoiceType {
    /// Premium voices (celebrity, emotional) meter at twice the standard rate.
    pub fn credits_per_character(self) -> u64 {
        match self {
            VoiceType::Standard => 1,
            VoiceType::Premium => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageProperties {
    pub voice_type: VoiceType,
    pub voice_name: String,
    pub character_count: u64,
    pub credits_consumed: u64,
}

/// Usage event sent to the metering provider's ingest endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub customer_id: String,
    pub event_name: String,
    pub timestamp: DateTime<Utc>,
    pub properties: UsageProperties,
}

/// Confirmation of a recorded usage event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedUsage {
    pub event_id: Option<String>,
    pub credits_consumed: u64,
}

/// Locally persisted user row; a convenience mirror keyed by the
/// provider-issued customer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub customer_id: String,
    pub email: String,
    pub first_name: String,
    pub full_name: String,
    pub created_at: String,
}
