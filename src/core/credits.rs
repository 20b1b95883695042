//! Credit/dollar conversion and voice-minute estimation.
//!
//! One credit costs $0.00025 (4 000 credits per dollar). Standard voices
//! meter one credit per character, premium voices two; a minute of
//! generated audio is budgeted at 1 000 characters.

use crate::domain::model::VoiceType;
use crate::utils::error::{Result, VocalisError};

pub const CREDITS_PER_DOLLAR: u64 = 4_000;
pub const MIN_PURCHASE_DOLLARS: f64 = 5.0;
pub const MAX_PURCHASE_DOLLARS: f64 = 500.0;
pub const CHARACTERS_PER_MINUTE: u64 = 1_000;

/// `floor(dollars / credit price)`, expressed as a multiply to keep the
/// arithmetic exact for whole-dollar amounts.
pub fn dollars_to_credits(dollars: f64) -> u64 {
    (dollars * CREDITS_PER_DOLLAR as f64).floor().max(0.0) as u64
}

pub fn credits_to_dollars(credits: u64) -> f64 {
    credits as f64 / CREDITS_PER_DOLLAR as f64
}

/// Credit total expressed in cents, truncated (integer math: 40 credits
/// to the cent).
pub fn credits_to_cents(credits: u64) -> u64 {
    credits * 100 / CREDITS_PER_DOLLAR
}

pub fn dollars_to_cents(dollars: f64) -> u64 {
    (dollars * 100.0).max(0.0) as u64
}

/// Clamp a purchase amount into the allowed range.
pub fn clamp_purchase(dollars: f64) -> f64 {
    dollars.clamp(MIN_PURCHASE_DOLLARS, MAX_PURCHASE_DOLLARS)
}

/// Reject purchase amounts outside the allowed range.
pub fn validate_purchase(dollars: f64) -> Result<()> {
    if !dollars.is_finite() || dollars < MIN_PURCHASE_DOLLARS || dollars > MAX_PURCHASE_DOLLARS {
        return Err(VocalisError::ValidationError {
            message: format!(
                "Purchase amount must be between ${MIN_PURCHASE_DOLLARS:.0} and ${MAX_PURCHASE_DOLLARS:.0}"
            ),
        });
    }
    Ok(())
}

/// Credit cost of generating voice for `character_count` characters.
pub fn voice_generation_cost(character_count: u64, voice: VoiceType) -> u64 {
    character_count * voice.credits_per_character()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MinutesEstimate {
    pub standard: u64,
    pub premium: u64,
}

/// Bucket a credit total into estimated voice minutes per voice tier.
/// Always reads as at least one minute.
pub fn estimate_minutes(credits: u64) -> MinutesEstimate {
    let per_minute = |voice: VoiceType| {
        (credits / (CHARACTERS_PER_MINUTE * voice.credits_per_character())).max(1)
    };
    MinutesEstimate {
        standard: per_minute(VoiceType::Standard),
        premium: per_minute(VoiceType::Premium),
    }
}

/// Compact display form: 1.5M / 2.5K / 999.
pub fn format_credits(credits: u64) -> String {
    if credits >= 1_000_000 {
        format!("{:.1}M", credits as f64 / 1_000_000.0)
    } else if credits >= 1_000 {
        format!("{:.1}K", credits as f64 / 1_000.0)
    } else {
        credits.to_string()
    }
}
