use super::FlakyConnector;
use polyshop_core::{FnListener, ObservedEvent};
use polyshop_reconnect::{ConnectEvent, ReconnectConfig, connect};
use polyshop_retry::RetryPolicy;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn recorder() -> (
    Arc<Mutex<Vec<String>>>,
    FnListener<ConnectEvent, impl Fn(&ConnectEvent) + Send + Sync + 'static>,
) {
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    let listener = FnListener::new(move |event: &ConnectEvent| {
        sink.lock().unwrap().push(event.event_type().to_string());
    });
    (names, listener)
}

#[tokio::test(start_paused = true)]
async fn successful_connect_after_retry_emits_in_order() {
    let (names, listener) = recorder();
    let config = ReconnectConfig::builder().listener(listener).build();

    connect(FlakyConnector::refusing(1), config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *names.lock().unwrap(),
        vec![
            "store.connect.attempt",
            "store.connect.failure",
            "store.connect.attempt",
            "store.connect.success",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn exhaustion_emits_terminal_event_without_trailing_failure() {
    let (names, listener) = recorder();
    let config = ReconnectConfig::builder()
        .policy(RetryPolicy::builder().max_attempts(2).build().unwrap())
        .listener(listener)
        .build();

    let _ = connect(FlakyConnector::never_up(), config, &CancellationToken::new()).await;

    assert_eq!(
        *names.lock().unwrap(),
        vec![
            "store.connect.attempt",
            "store.connect.failure",
            "store.connect.attempt",
            "store.connect.exhausted",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn retry_callback_sees_delay_about_to_be_applied() {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&delays);
    let config = ReconnectConfig::builder()
        .policy(
            RetryPolicy::builder()
                .initial_delay(Duration::from_millis(100))
                .max_delay(Duration::from_secs(2))
                .jitter_fraction(0.0)
                .build()
                .unwrap(),
        )
        .on_retry(move |attempt, delay| sink.lock().unwrap().push((attempt, delay)))
        .build();

    connect(FlakyConnector::refusing(3), config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        *delays.lock().unwrap(),
        vec![
            (1, Duration::from_millis(200)),
            (2, Duration::from_millis(400)),
            (3, Duration::from_millis(800)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn panicking_listener_does_not_break_connect() {
    let config = ReconnectConfig::builder()
        .on_attempt(|_| panic!("listener bug"))
        .build();

    let handle = connect(FlakyConnector::refusing(0), config, &CancellationToken::new()).await;
    assert!(handle.is_ok());
}
