//! Server-push balance events.
//!
//! Webhook handlers publish into per-customer broadcast channels; the
//! SSE endpoint subscribes and forwards. A customer with no open stream
//! simply drops events on the floor (the balance endpoint remains the
//! authoritative read path).

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BalanceEvent {
    Connected {
        customer_id: String,
    },
    BalanceUpdated {
        balance: u64,
        dollar_value: f64,
        source: String,
    },
    AutoRechargeComplete {
        new_balance: u64,
        dollar_value: f64,
    },
    AutoRechargeFailed {
        reason: String,
    },
    Ping,
}

impl BalanceEvent {
    /// Wire tag the browser listener switches on.
    pub fn tag(&self) -> &'static str {
        match self {
            BalanceEvent::Connected { .. } => "connected",
            BalanceEvent::BalanceUpdated { .. } => "balance_updated",
            BalanceEvent::AutoRechargeComplete { .. } => "auto_recharge_complete",
            BalanceEvent::AutoRechargeFailed { .. } => "auto_recharge_failed",
            BalanceEvent::Ping => "ping",
        }
    }
}

#[derive(Clone, Default)]
pub struct EventHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<BalanceEvent>>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, customer_id: &str) -> broadcast::Receiver<BalanceEvent> {
        let mut channels = self.channels.lock();
        channels
            .entry(customer_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Deliver an event to every open stream for `customer_id`; returns
    /// the number of receivers it reached.
    pub fn publish(&self, customer_id: &str, event: BalanceEvent) -> usize {
        let mut channels = self.channels.lock();
        match channels.get(customer_id).map(|sender| sender.send(event)) {
            Some(Ok(delivered)) => delivered,
            Some(Err(_)) => {
                // 所有訂閱者已斷線，回收 channel
                channels.remove(customer_id);
                0
            }
            None => 0,
        }
    }

    pub fn subscriber_count(&self, customer_id: &str) -> usize {
        self.channels
            .lock()
            .get(customer_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}
