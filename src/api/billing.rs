use crate::api::{AppState, CustomerQuery};
use crate::core::credits::{
    self, CHARACTERS_PER_MINUTE, CREDITS_PER_DOLLAR, MAX_PURCHASE_DOLLARS, MIN_PURCHASE_DOLLARS,
};
use crate::core::recharge::{self, RechargeBundle, MIN_RECHARGE_DOLLARS, THRESHOLD_CHOICES};
use crate::domain::model::{AutoRechargeConfig, BalanceSnapshot, PurchaseOrder, VoiceType};
use crate::utils::error::{Result, VocalisError};

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

const PREPAID_BILLING_TYPE: &str = "prepaid_credits";

#[derive(Debug, Deserialize)]
pub struct CreditPurchaseRequest {
    pub billing_type: String,
    pub credits: u64,
    pub amount: f64,
    pub auto_recharge: Option<AutoRechargeConfig>,
}

#[derive(Debug, Serialize)]
pub struct CreditPurchaseResponse {
    pub success: bool,
    pub contract_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub message: String,
}

/// Purchase credits: validate the order, then turn it into a billing
/// contract at the metering provider.
pub async fn purchase_credits(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
    Json(request): Json<CreditPurchaseRequest>,
) -> Result<Json<CreditPurchaseResponse>> {
    if request.billing_type != PREPAID_BILLING_TYPE {
        return Err(VocalisError::ValidationError {
            message: format!(
                "Unsupported billing_type '{}', expected '{PREPAID_BILLING_TYPE}'",
                request.billing_type
            ),
        });
    }

    credits::validate_purchase(request.amount)?;

    // 前端算好的 credits 數與金額不一致時以金額為準
    let expected_credits = credits::dollars_to_credits(request.amount);
    if request.credits != expected_credits {
        tracing::warn!(
            "⚠️ Purchase credits mismatch: got {}, ${:.2} buys {}",
            request.credits,
            request.amount,
            expected_credits
        );
    }

    let warning = match &request.auto_recharge {
        Some(config) => recharge::validate_auto_recharge(config, expected_credits)?.warning,
        None => None,
    };
    if let Some(w) = &warning {
        tracing::warn!("⚠️ {}", w);
    }

    let order = PurchaseOrder {
        credits: expected_credits,
        amount: request.amount,
        auto_recharge: request.auto_recharge,
    };

    let contract = state
        .metering
        .create_billing_contract(&query.customer_id, &order)
        .await?;

    tracing::info!(
        "✅ Credits purchased: {} credits for {} (contract {})",
        order.credits,
        query.customer_id,
        contract.id
    );

    Ok(Json(CreditPurchaseResponse {
        success: true,
        contract_id: contract.id,
        warning,
        message: "Credits purchased successfully".to_string(),
    }))
}

/// Current credit balance, straight from the metering provider.
pub async fn credit_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<BalanceSnapshot>> {
    let snapshot = state.metering.get_customer_balance(&customer_id).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub credits_per_dollar: u64,
    pub min_purchase_dollars: f64,
    pub max_purchase_dollars: f64,
    pub min_recharge_dollars: f64,
    pub recharge_thresholds: Vec<u64>,
    pub recharge_bundles: Vec<RechargeBundle>,
    pub standard_credits_per_character: u64,
    pub premium_credits_per_character: u64,
    pub characters_per_minute: u64,
    pub plan_creator_dollars: u32,
    pub plan_pro_dollars: u32,
    pub trial_credits: u64,
    pub trial_days: u32,
}

/// The fixed pricing tables the purchase pages render.
pub async fn pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    let plans = &state.settings.plans;
    Json(PricingResponse {
        credits_per_dollar: CREDITS_PER_DOLLAR,
        min_purchase_dollars: MIN_PURCHASE_DOLLARS,
        max_purchase_dollars: MAX_PURCHASE_DOLLARS,
        min_recharge_dollars: MIN_RECHARGE_DOLLARS,
        recharge_thresholds: THRESHOLD_CHOICES.to_vec(),
        recharge_bundles: recharge::RECHARGE_CHOICES.to_vec(),
        standard_credits_per_character: VoiceType::Standard.credits_per_character(),
        premium_credits_per_character: VoiceType::Premium.credits_per_character(),
        characters_per_minute: CHARACTERS_PER_MINUTE,
        plan_creator_dollars: plans.creator_dollars,
        plan_pro_dollars: plans.pro_dollars,
        trial_credits: plans.trial_credits,
        trial_days: plans.trial_days,
    })
}
