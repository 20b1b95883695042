use crate::api::AppState;
use crate::events::BalanceEvent;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_stream::{Stream, StreamExt};

const PING_INTERVAL: Duration = Duration::from_secs(15);

fn sse_event(event: &BalanceEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.tag()).data(data)
}

/// Per-customer balance event stream.
///
/// Emits `connected` first, then hub events as they arrive, with `ping`
/// events in between. Reconnection is left entirely to the browser's
/// built-in EventSource retry.
pub async fn balance_stream(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    tracing::debug!("📡 Balance stream opened for {}", customer_id);

    let receiver = state.hub.subscribe(&customer_id);

    let connected = tokio_stream::once(BalanceEvent::Connected {
        customer_id: customer_id.clone(),
    });
    let updates = BroadcastStream::new(receiver).filter_map(|item| item.ok());
    let pings =
        IntervalStream::new(tokio::time::interval(PING_INTERVAL)).map(|_| BalanceEvent::Ping);

    let stream = connected
        .chain(updates.merge(pings))
        .map(|event| Ok(sse_event(&event)));

    Sse::new(stream)
}
