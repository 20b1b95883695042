use crate::domain::model::{BalanceSnapshot, Contract, Customer, PurchaseOrder, RecordedUsage, UsageEvent};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Surface area of the metering provider used by the API layer, so the
/// HTTP-backed client and the fail-fast stub are interchangeable.
#[async_trait]
pub trait Metering: Send + Sync {
    async fn create_customer(&self, name: &str, email: &str) -> Result<Customer>;

    async fn get_customer(&self, customer_id: &str) -> Result<serde_json::Value>;

    async fn set_customer_aliases(&self, customer_id: &str, aliases: &[String]) -> Result<()>;

    /// Resolve a rate card id by name; `None` when no card matches.
    async fn get_rate_card(&self, rate_card_name: &str) -> Result<Option<String>>;

    /// Read-only lookup of the prepaid credits product.
    async fn find_prepaid_product(&self) -> Result<Option<String>>;

    async fn get_or_create_prepaid_product(&self) -> Result<String>;

    async fn create_billing_contract(
        &self,
        customer_id: &str,
        order: &PurchaseOrder,
    ) -> Result<Contract>;

    async fn get_customer_balance(&self, customer_id: &str) -> Result<BalanceSnapshot>;

    async fn record_usage_event(&self, event: &UsageEvent) -> Result<RecordedUsage>;
}
