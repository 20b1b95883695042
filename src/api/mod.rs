pub mod auth;
pub mod billing;
pub mod events;
pub mod health;
pub mod usage;
pub mod webhooks;

use crate::config::Settings;
use crate::domain::ports::Metering;
use crate::email::Mailer;
use crate::events::EventHub;
use crate::store::UserStore;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Customer id arrives as a query parameter, mirroring the session-scoped
/// id the pages carry around.
#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    pub customer_id: String,
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub metering: Arc<dyn Metering>,
    pub store: UserStore,
    pub hub: EventHub,
    pub mailer: Arc<Mailer>,
}

/// Build the axum router with shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/health/integrations", get(health::integrations))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/billing/credits/purchase", post(billing::purchase_credits))
        .route(
            "/api/billing/credits/balance/{customer_id}",
            get(billing::credit_balance),
        )
        .route("/api/billing/pricing", get(billing::pricing))
        .route("/api/usage/generate-voice", post(usage::generate_voice))
        .route(
            "/api/webhooks/metronome/auto-recharge",
            post(webhooks::auto_recharge),
        )
        .route(
            "/api/webhooks/metronome/balance-update",
            post(webhooks::balance_update),
        )
        .route("/api/events/balance/{customer_id}", get(events::balance_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
