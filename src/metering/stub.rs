use crate::domain::model::{
    BalanceSnapshot, Contract, Customer, PurchaseOrder, RecordedUsage, UsageEvent,
};
use crate::domain::ports::Metering;
use crate::utils::error::{Result, VocalisError};

use async_trait::async_trait;

/// Fail-fast metering stub used when no API key is configured. Every
/// operation returns a not-implemented error without performing I/O, so
/// misconfiguration is visible immediately instead of producing silent
/// unmetered usage.
pub struct StubMetering;

fn not_implemented<T>(operation: &str) -> Result<T> {
    Err(VocalisError::NotImplemented {
        operation: operation.to_string(),
    })
}

#[async_trait]
impl Metering for StubMetering {
    async fn create_customer(&self, _name: &str, _email: &str) -> Result<Customer> {
        not_implemented("create_customer")
    }

    async fn get_customer(&self, _customer_id: &str) -> Result<serde_json::Value> {
        not_implemented("get_customer")
    }

    async fn set_customer_aliases(&self, _customer_id: &str, _aliases: &[String]) -> Result<()> {
        not_implemented("set_customer_aliases")
    }

    async fn get_rate_card(&self, _rate_card_name: &str) -> Result<Option<String>> {
        not_implemented("get_rate_card")
    }

    async fn find_prepaid_product(&self) -> Result<Option<String>> {
        not_implemented("find_prepaid_product")
    }

    async fn get_or_create_prepaid_product(&self) -> Result<String> {
        not_implemented("get_or_create_prepaid_product")
    }

    async fn create_billing_contract(
        &self,
        _customer_id: &str,
        _order: &PurchaseOrder,
    ) -> Result<Contract> {
        not_implemented("create_billing_contract")
    }

    async fn get_customer_balance(&self, _customer_id: &str) -> Result<BalanceSnapshot> {
        not_implemented("get_customer_balance")
    }

    async fn record_usage_event(&self, _event: &UsageEvent) -> Result<RecordedUsage> {
        not_implemented("record_usage_event")
    }
}
