use crate::api::AppState;
use crate::config::Settings;
use crate::core::credits::credits_to_dollars;
use crate::events::BalanceEvent;
use crate::utils::error::{Result, VocalisError};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Compare the shared secret when one is configured; without a configured
/// secret the endpoint accepts unauthenticated posts (dev setups).
fn check_secret(settings: &Settings, headers: &HeaderMap) -> Result<()> {
    if let Some(expected) = &settings.metronome.webhook_secret {
        let provided = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(VocalisError::Unauthorized {
                message: "invalid webhook secret".to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct AutoRechargePayload {
    pub customer_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub new_balance: u64,
    pub reason: Option<String>,
}

/// Metronome auto-recharge outcome: forward to the customer's stream.
pub async fn auto_recharge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AutoRechargePayload>,
) -> Result<Json<Value>> {
    check_secret(&state.settings, &headers)?;

    let event = if payload.success {
        BalanceEvent::AutoRechargeComplete {
            new_balance: payload.new_balance,
            dollar_value: credits_to_dollars(payload.new_balance),
        }
    } else {
        BalanceEvent::AutoRechargeFailed {
            reason: payload
                .reason
                .unwrap_or_else(|| "unknown failure".to_string()),
        }
    };

    let delivered = state.hub.publish(&payload.customer_id, event);
    tracing::info!(
        "📨 Auto-recharge webhook for {} ({} listeners)",
        payload.customer_id,
        delivered
    );

    Ok(Json(json!({
        "status": "received",
        "message": "Auto-recharge webhook processed",
    })))
}

#[derive(Debug, Deserialize)]
pub struct BalanceUpdatePayload {
    pub customer_id: String,
    #[serde(default)]
    pub balance: u64,
    pub source: Option<String>,
}

/// Metronome balance change: forward the new figure to the stream.
pub async fn balance_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BalanceUpdatePayload>,
) -> Result<Json<Value>> {
    check_secret(&state.settings, &headers)?;

    let event = BalanceEvent::BalanceUpdated {
        balance: payload.balance,
        dollar_value: credits_to_dollars(payload.balance),
        source: payload.source.unwrap_or_else(|| "metronome".to_string()),
    };

    let delivered = state.hub.publish(&payload.customer_id, event);
    tracing::info!(
        "📨 Balance-update webhook for {} ({} listeners)",
        payload.customer_id,
        delivered
    );

    Ok(Json(json!({
        "status": "received",
        "message": "Balance update webhook processed",
    })))
}
