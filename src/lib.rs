pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod email;
pub mod events;
pub mod metering;
pub mod store;
pub mod utils;

pub use api::{router, AppState};
pub use config::{ServerArgs, Settings};
pub use domain::ports::Metering;
pub use email::Mailer;
pub use events::{BalanceEvent, EventHub};
pub use metering::{MetronomeClient, StubMetering};
pub use store::UserStore;
pub use utils::error::{Result, VocalisError};
