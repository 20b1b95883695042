use crate::api::AppState;
use crate::metering::PREPAID_PRODUCT_NAME;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "vocalis-saas" }))
}

/// Read-only self-check for the Metronome integration:
/// - credentials present
/// - API reachable
/// - configured rate card resolves by name
/// - prepaid product exists (no create)
pub async fn integrations(State(state): State<AppState>) -> Json<Value> {
    let metronome = &state.settings.metronome;
    let mut checks = json!({
        "metronome": {
            "base_url": metronome.api_url,
            "rate_card_name": metronome.rate_card_name,
        }
    });

    let creds_ok = state.settings.metering_configured();
    checks["metronome"]["credentials_present"] = json!(creds_ok);

    if !creds_ok {
        return Json(json!({
            "status": "error",
            "summary": "Missing metronome.api_key",
            "checks": checks,
        }));
    }

    // One list call covers reachability and rate-card resolution.
    let rate_card_ok = match state.metering.get_rate_card(&metronome.rate_card_name).await {
        Ok(resolved) => {
            checks["metronome"]["reachability"] = json!({ "ok": true });
            checks["metronome"]["rate_card_resolved"] = json!({
                "ok": resolved.is_some(),
                "id": resolved,
                "name": metronome.rate_card_name,
            });
            resolved.is_some()
        }
        Err(e) => {
            checks["metronome"]["reachability"] = json!({ "ok": false, "error": e.to_string() });
            return Json(json!({
                "status": "error",
                "summary": "Unable to call Metronome API",
                "checks": checks,
            }));
        }
    };

    match state.metering.find_prepaid_product().await {
        Ok(product_id) => {
            checks["metronome"]["product_present"] = json!({
                "ok": product_id.is_some(),
                "id": product_id,
                "name": PREPAID_PRODUCT_NAME,
            });
        }
        Err(e) => {
            checks["metronome"]["product_present"] = json!({ "ok": false, "error": e.to_string() });
        }
    }

    let status = if rate_card_ok { "ok" } else { "warn" };
    let summary = if rate_card_ok {
        "Metronome reachable; see checks for details"
    } else {
        "Some checks failed"
    };

    Json(json!({
        "status": status,
        "summary": summary,
        "checks": checks,
    }))
}
