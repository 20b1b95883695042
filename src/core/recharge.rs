//! Auto-recharge validation rules.
//!
//! Threshold and recharge amount both come from fixed enumerated choices;
//! a threshold sitting at or above 85% of the purchase amount earns an
//! advisory warning because the first recharge would trigger almost
//! immediately.

use crate::domain::model::AutoRechargeConfig;
use crate::utils::error::{Result, VocalisError};
use serde::Serialize;

/// Balances (in credits) at which a recharge may trigger.
pub const THRESHOLD_CHOICES: [u64; 3] = [10_000, 25_000, 50_000];

/// Purchasable recharge bundles.
pub const RECHARGE_CHOICES: [RechargeBundle; 4] = [
    RechargeBundle {
        credits: 20_000,
        price_dollars: 5.0,
    },
    RechargeBundle {
        credits: 40_000,
        price_dollars: 10.0,
    },
    RechargeBundle {
        credits: 100_000,
        price_dollars: 25.0,
    },
    RechargeBundle {
        credits: 200_000,
        price_dollars: 50.0,
    },
];

pub const MIN_RECHARGE_DOLLARS: f64 = 5.0;

/// Warn when threshold >= 85% of the purchase amount.
pub const THRESHOLD_WARNING_PERCENT: u64 = 85;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RechargeBundle {
    pub credits: u64,
    pub price_dollars: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RechargeAssessment {
    pub warning: Option<String>,
}

/// Integer-exact ratio check: threshold/purchase >= 85%.
pub fn threshold_too_close(threshold: u64, purchase_credits: u64) -> bool {
    purchase_credits > 0
        && threshold.saturating_mul(100) >= purchase_credits.saturating_mul(THRESHOLD_WARNING_PERCENT)
}

/// Validate an auto-recharge configuration against the enumerated
/// choices and the purchase it rides along with. A disabled config is
/// always acceptable.
pub fn validate_auto_recharge(
    cfg: &AutoRechargeConfig,
    purchase_credits: u64,
) -> Result<RechargeAssessment> {
    if !cfg.enabled {
        return Ok(RechargeAssessment::default());
    }

    if !THRESHOLD_CHOICES.contains(&cfg.threshold) {
        return Err(VocalisError::ValidationError {
            message: format!(
                "Auto-recharge threshold must be one of {:?} credits, got {}",
                THRESHOLD_CHOICES, cfg.threshold
            ),
        });
    }

    let bundle = RECHARGE_CHOICES
        .iter()
        .find(|b| b.credits == cfg.amount)
        .ok_or_else(|| VocalisError::ValidationError {
            message: format!(
                "Auto-recharge amount must be one of {:?} credits, got {}",
                RECHARGE_CHOICES.map(|b| b.credits),
                cfg.amount
            ),
        })?;

    if cfg.price < MIN_RECHARGE_DOLLARS {
        return Err(VocalisError::ValidationError {
            message: format!(
                "Auto-recharge price must be at least ${MIN_RECHARGE_DOLLARS:.0}, got ${:.2}",
                cfg.price
            ),
        });
    }

    if (cfg.price - bundle.price_dollars).abs() > f64::EPSILON {
        // 前端價格表過期時記錄，但以服務端的 bundle 價格為準
        tracing::warn!(
            "⚠️ Recharge price mismatch: got ${:.2}, bundle lists ${:.2}",
            cfg.price,
            bundle.price_dollars
        );
    }

    let warning = if threshold_too_close(cfg.threshold, purchase_credits) {
        Some(format!(
            "Your recharge threshold ({} credits) is within {}% of this purchase ({} credits); auto-recharge may trigger right away",
            cfg.threshold, THRESHOLD_WARNING_PERCENT, purchase_credits
        ))
    } else {
        None
    };

    Ok(RechargeAssessment { warning })
}
