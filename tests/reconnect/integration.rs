use super::FlakyConnector;
use polyshop_reconnect::{
    AttemptFailure, ConnectError, ConnectionState, ReconnectConfig, ReconnectingStore, connect,
};
use polyshop_retry::{RetryPolicy, base_delay, jitter_bounds};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::builder()
        .initial_delay(Duration::from_millis(100))
        .max_delay(Duration::from_secs(2))
        .max_attempts(max_attempts)
        .jitter_fraction(0.1)
        .build()
        .unwrap()
}

fn config(max_attempts: u32) -> ReconnectConfig {
    ReconnectConfig::builder()
        .name("integration")
        .policy(policy(max_attempts))
        .build()
}

#[tokio::test(start_paused = true)]
async fn reachable_store_connects_on_first_attempt() {
    let connector = FlakyConnector::refusing(0);
    let observer = connector.clone();

    let handle = connect(connector, config(6), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(observer.opens(), 1);
    assert_eq!(handle.attempts(), 1);
    assert_eq!(*handle.connection(), 1);
    assert_eq!(handle.target(), "flaky:6379");
}

#[tokio::test(start_paused = true)]
async fn store_that_comes_up_late_is_reached() {
    let connector = FlakyConnector::refusing(4);
    let observer = connector.clone();

    let handle = connect(connector, config(6), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(observer.opens(), 5);
    assert_eq!(handle.attempts(), 5);
    assert_eq!(handle.state(), ConnectionState::Connected);
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_fails_after_exactly_max_attempts() {
    for max_attempts in [1, 2, 6] {
        let connector = FlakyConnector::never_up();
        let observer = connector.clone();

        let err = connect(connector, config(max_attempts), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), max_attempts);
        assert_eq!(observer.opens(), max_attempts);
    }
}

#[tokio::test(start_paused = true)]
async fn attempts_are_spaced_by_jittered_backoff() {
    let connector = FlakyConnector::never_up();
    let observer = connector.clone();
    let policy = policy(7);

    let cfg = ReconnectConfig::builder().policy(policy).build();
    let _ = connect(connector, cfg, &CancellationToken::new()).await;

    let gaps = observer.gaps();
    assert_eq!(gaps.len(), 6);
    for (i, gap) in gaps.iter().enumerate() {
        let failed_attempt = i as u32 + 1;
        let (low, high) = jitter_bounds(&policy, base_delay(&policy, failed_attempt));
        // The paused clock rounds timers up to the next millisecond.
        assert!(
            *gap >= low && *gap <= high + Duration::from_millis(1),
            "gap after attempt {failed_attempt} was {gap:?}, expected [{low:?}, {high:?}]"
        );
    }
    // 200, 400, 800, 1600 and then clamped at 2000.
    assert!(gaps[4] >= Duration::from_millis(1800));
    assert!(gaps[5] <= Duration::from_millis(2201));
}

#[tokio::test(start_paused = true)]
async fn no_delay_before_first_attempt() {
    let connector = FlakyConnector::refusing(0);
    let start = Instant::now();

    connect(connector, config(3), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn failing_liveness_check_counts_as_failed_attempt() {
    let connector = FlakyConnector::refusing(0);
    connector.set_fail_ping(true);
    let observer = connector.clone();

    let err = connect(connector, config(3), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        ConnectError::Exhausted { last, attempts, .. } => {
            assert_eq!(attempts, 3);
            assert!(matches!(last, AttemptFailure::Store(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Each opened-but-unverified pool is released.
    assert_eq!(observer.closes(), 3);
}

#[tokio::test(start_paused = true)]
async fn hanging_liveness_check_is_bounded_by_attempt_timeout() {
    let connector = FlakyConnector::refusing(0);
    connector.set_hang_ping(true);
    let cfg = ReconnectConfig::builder()
        .policy(policy(2))
        .attempt_timeout(Duration::from_secs(1))
        .build();

    let start = Instant::now();
    let err = connect(connector, cfg, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConnectError::Exhausted {
            last: AttemptFailure::TimedOut(_),
            ..
        }
    ));
    // Two 1s attempts plus one backoff of at most 220ms.
    assert!(start.elapsed() < Duration::from_millis(2300));
}

#[tokio::test(start_paused = true)]
async fn cancel_during_backoff_returns_immediately() {
    let connector = FlakyConnector::never_up();
    let cfg = ReconnectConfig::builder()
        .policy(
            RetryPolicy::builder()
                .initial_delay(Duration::from_secs(5))
                .max_delay(Duration::from_secs(60))
                .max_attempts(5)
                .build()
                .unwrap(),
        )
        .build();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = connect(connector, cfg, &cancel).await.unwrap_err();

    assert!(matches!(err, ConnectError::Cancelled { attempts: 1, .. }));
    assert!(!err.is_exhausted());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_token_stops_before_connecting() {
    let connector = FlakyConnector::refusing(0);
    let observer = connector.clone();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = connect(connector, config(3), &cancel).await.unwrap_err();

    assert!(matches!(err, ConnectError::Cancelled { .. }));
    assert_eq!(observer.opens(), 0);
}

#[tokio::test(start_paused = true)]
async fn startup_budget_caps_total_time() {
    let connector = FlakyConnector::never_up();
    let cfg = ReconnectConfig::builder()
        .policy(policy(100))
        .deadline(Duration::from_secs(30))
        .build();

    let start = Instant::now();
    let err = connect(connector, cfg, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectError::DeadlineElapsed { .. }));
    assert!(start.elapsed() >= Duration::from_secs(30));
    assert!(start.elapsed() < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn state_moves_through_connecting_to_failed() {
    let store = ReconnectingStore::new(FlakyConnector::never_up(), config(3));
    let state = store.state();

    let cancel = CancellationToken::new();
    let task = tokio::spawn(async move { store.connect(&cancel).await });

    // Let the first attempt fail and the first backoff begin.
    tokio::task::yield_now().await;
    assert!(matches!(
        state.state(),
        ConnectionState::Connecting | ConnectionState::Disconnected
    ));

    assert!(task.await.unwrap().is_err());
    assert_eq!(state.state(), ConnectionState::Failed);
    assert_eq!(state.attempts(), 3);
}
