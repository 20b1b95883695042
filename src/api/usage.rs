use crate::api::{AppState, CustomerQuery};
use crate::core::credits::voice_generation_cost;
use crate::domain::model::{UsageEvent, UsageProperties, VoiceType};
use crate::utils::error::{Result, VocalisError};
use crate::utils::validation::validate_non_empty_string;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const VOICE_GENERATION_EVENT: &str = "voice_generation";

#[derive(Debug, Deserialize)]
pub struct VoiceGenerationRequest {
    pub text: String,
    pub voice_name: String,
    pub voice_type: VoiceType,
    #[serde(default)]
    pub character_count: u64,
    #[serde(default)]
    pub estimated_credits: u64,
}

#[derive(Debug, Serialize)]
pub struct VoiceGenerationResponse {
    pub success: bool,
    pub credits_consumed: u64,
    pub message: String,
}

/// Generate voice for a text and meter the consumed credits.
///
/// The credit cost is recomputed server-side from the character count and
/// voice tier; the client's estimate is display-only.
pub async fn generate_voice(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
    Json(request): Json<VoiceGenerationRequest>,
) -> Result<Json<VoiceGenerationResponse>> {
    validate_non_empty_string("text", &request.text)?;
    validate_non_empty_string("voice_name", &request.voice_name)?;

    let character_count = if request.character_count > 0 {
        request.character_count
    } else {
        request.text.chars().count() as u64
    };
    let cost = voice_generation_cost(character_count, request.voice_type);

    if request.estimated_credits != 0 && request.estimated_credits != cost {
        tracing::debug!(
            "Client estimated {} credits, server computed {}",
            request.estimated_credits,
            cost
        );
    }

    let snapshot = state
        .metering
        .get_customer_balance(&query.customer_id)
        .await?;
    if snapshot.balance < cost {
        return Err(VocalisError::InsufficientCredits {
            needed: cost,
            available: snapshot.balance,
        });
    }

    // TODO: call the real voice synthesis service once it is deployed;
    // until then generation is simulated and only the metering is real.

    let event = UsageEvent {
        customer_id: query.customer_id.clone(),
        event_name: VOICE_GENERATION_EVENT.to_string(),
        timestamp: Utc::now(),
        properties: UsageProperties {
            voice_type: request.voice_type,
            voice_name: request.voice_name.clone(),
            character_count,
            credits_consumed: cost,
        },
    };

    let recorded = state.metering.record_usage_event(&event).await?;

    tracing::info!(
        "✅ Voice generated for {}: {} chars, {} credits",
        query.customer_id,
        character_count,
        recorded.credits_consumed
    );

    Ok(Json(VoiceGenerationResponse {
        success: true,
        credits_consumed: recorded.credits_consumed,
        message: "Voice generated successfully".to_string(),
    }))
}
