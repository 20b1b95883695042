pub mod credits;
pub mod recharge;

pub use crate::domain::model::{
    AutoRechargeConfig, BalanceSnapshot, Contract, Customer, PurchaseOrder, RecordedUsage,
    UsageEvent, VoiceType,
};
pub use crate::domain::ports::Metering;
pub use crate::utils::error::Result;
