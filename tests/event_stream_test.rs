use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tower::ServiceExt;

use vocalis::api::{router, AppState};
use vocalis::{BalanceEvent, EventHub, Mailer, Settings, StubMetering, UserStore};

fn sse_state() -> AppState {
    let settings = Settings::default();
    AppState {
        settings: Arc::new(settings.clone()),
        metering: Arc::new(StubMetering),
        store: UserStore::open_in_memory().unwrap(),
        hub: EventHub::new(),
        mailer: Arc::new(Mailer::from_settings(&settings.email).unwrap()),
    }
}

async fn read_until(body: &mut axum::body::BodyDataStream, needle: &str) -> String {
    let mut seen = String::new();
    for _ in 0..10 {
        let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
            .await
            .expect("timed out waiting for SSE frame")
            .expect("stream ended unexpectedly")
            .expect("body error");
        seen.push_str(&String::from_utf8_lossy(&chunk));
        if seen.contains(needle) {
            return seen;
        }
    }
    panic!("never saw {needle:?} in stream, got: {seen}");
}

#[tokio::test]
async fn test_stream_opens_with_connected_event() {
    let state = sse_state();
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/events/balance/cus_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let seen = read_until(&mut body, "event: connected").await;
    assert!(seen.contains("cus_1"));
}

#[tokio::test]
async fn test_published_events_reach_the_stream() {
    let state = sse_state();
    let hub = state.hub.clone();
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/events/balance/cus_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The handler has subscribed by the time the response exists, so a
    // publish now is buffered for the stream.
    let delivered = hub.publish(
        "cus_1",
        BalanceEvent::BalanceUpdated {
            balance: 48_000,
            dollar_value: 12.0,
            source: "webhook".to_string(),
        },
    );
    assert_eq!(delivered, 1);

    let mut body = response.into_body().into_data_stream();
    let seen = read_until(&mut body, "event: balance_updated").await;
    assert!(seen.contains("\"balance\":48000"));
    assert!(seen.contains("event: connected"), "connected comes first");
}

#[tokio::test]
async fn test_streams_are_customer_scoped() {
    let state = sse_state();
    let hub = state.hub.clone();
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/events/balance/cus_a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // an event for another customer reaches nobody on this stream
    assert_eq!(hub.publish("cus_b", BalanceEvent::Ping), 0);
    assert_eq!(hub.subscriber_count("cus_a"), 1);

    let mut body = response.into_body().into_data_stream();
    let seen = read_until(&mut body, "event: connected").await;
    assert!(!seen.contains("cus_b"));
}
