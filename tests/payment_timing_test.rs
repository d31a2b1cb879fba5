//! Wall-clock latency checks for payment resolution. These run on real time
//! on purpose: the signalling tasks are independent of the resolver's clock.

use fieldnotes::payment::{PaymentStatus, resolve_payment};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

// Generous upper bound so a loaded CI machine doesn't flake.
const LATENCY_SLACK: Duration = Duration::from_millis(50);

#[tokio::test]
async fn confirmation_is_observed_promptly() {
    let token = CancellationToken::new();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = tx.send(());
    });

    let started = Instant::now();
    let status = resolve_payment(token, rx).await;
    let elapsed = started.elapsed();

    assert_eq!(status, PaymentStatus::Confirmed);
    assert!(elapsed >= Duration::from_millis(100), "resolved early: {elapsed:?}");
    assert!(
        elapsed < Duration::from_millis(100) + LATENCY_SLACK,
        "resolved late: {elapsed:?}"
    );
}

#[tokio::test]
async fn cancellation_is_observed_promptly() {
    let token = CancellationToken::new();
    let (_tx, rx) = oneshot::channel();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let status = resolve_payment(token, rx).await;
    let elapsed = started.elapsed();

    assert_eq!(status, PaymentStatus::Cancelled);
    assert!(elapsed >= Duration::from_millis(100), "resolved early: {elapsed:?}");
    assert!(
        elapsed < Duration::from_millis(100) + LATENCY_SLACK,
        "resolved late: {elapsed:?}"
    );
}
