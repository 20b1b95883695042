use crate::api::AppState;
use crate::domain::model::UserRecord;
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_non_empty_string};

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub customer_id: String,
    pub message: String,
}

/// Create a new account: register the customer at the metering provider,
/// mirror it locally, optionally send the welcome email.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    validate_non_empty_string("full_name", &request.full_name)?;
    validate_non_empty_string("password", &request.password)?;
    validate_email("email", &request.email)?;

    let customer = state
        .metering
        .create_customer(&request.full_name, &request.email)
        .await?;

    state.store.upsert_user(&UserRecord {
        customer_id: customer.id.clone(),
        email: request.email.clone(),
        first_name: request.first_name.clone(),
        full_name: request.full_name.clone(),
        created_at: Utc::now().to_rfc3339(),
    })?;

    if state.settings.email.send_welcome_on_signup {
        let plans = &state.settings.plans;
        let trial_end = (Utc::now() + Duration::days(plans.trial_days as i64))
            .format("%Y-%m-%d")
            .to_string();
        // Best-effort: a failed email must not fail the signup.
        if let Err(e) = state
            .mailer
            .send_welcome(
                &request.email,
                &request.first_name,
                plans.trial_credits,
                plans.trial_days,
                Some(&trial_end),
            )
            .await
        {
            tracing::warn!("📧 Welcome email failed for {}: {}", customer.id, e);
        }
    }

    tracing::info!("✅ Account created: {} ({})", customer.id, request.email);

    Ok(Json(SignupResponse {
        success: true,
        customer_id: customer.id,
        message: "Account created successfully".to_string(),
    }))
}
