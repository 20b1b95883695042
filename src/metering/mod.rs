pub mod http_client;
pub mod stub;

pub use http_client::{MetronomeClient, PREPAID_PRODUCT_NAME};
pub use stub::StubMetering;
