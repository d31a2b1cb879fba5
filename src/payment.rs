//! Payment status resolution.
//!
//! `resolve_payment` waits for whichever of two racing signals fires first:
//! a single-fire confirmation, or cancellation of the caller's token. The
//! confirmation signal is an explicit argument rather than an ambient value,
//! and the wait is multiplexed rather than polled, so the resolver adds no
//! latency of its own. It carries no internal timeout: if neither signal ever
//! fires, the call never returns, and bounding it is the caller's job.

use serde::Serialize;
use std::fmt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Terminal outcome of a payment resolution. There is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Confirmed => write!(f, "CONFIRMED"),
            PaymentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Blocks until the payment is confirmed or cancelled.
///
/// Confirmation wins when both signals are ready at the same time. A
/// confirmation sender that is dropped without firing is not a confirmation;
/// the resolver then waits out the cancellation alone. Every terminal
/// cancellation cause (explicit cancel, a caller-imposed deadline that
/// cancels the token) maps to [`PaymentStatus::Cancelled`].
pub async fn resolve_payment(
    cancellation: CancellationToken,
    confirmation: oneshot::Receiver<()>,
) -> PaymentStatus {
    tokio::select! {
        biased;
        received = confirmation => match received {
            Ok(()) => {
                tracing::debug!("payment confirmed");
                PaymentStatus::Confirmed
            }
            Err(_) => {
                // Confirmation can no longer arrive; only cancellation remains.
                cancellation.cancelled().await;
                PaymentStatus::Cancelled
            }
        },
        _ = cancellation.cancelled() => {
            tracing::debug!("payment cancelled");
            PaymentStatus::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn confirmation_before_cancellation_confirms() {
        let token = CancellationToken::new();
        let (tx, rx) = oneshot::channel();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(());
        });
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        assert_eq!(resolve_payment(token, rx).await, PaymentStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_confirmation_cancels() {
        let token = CancellationToken::new();
        // Keep the sender alive so the confirmation stays pending.
        let (_tx, rx) = oneshot::channel();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        assert_eq!(resolve_payment(token, rx).await, PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn simultaneous_signals_prefer_confirmation() {
        let token = CancellationToken::new();
        let (tx, rx) = oneshot::channel();

        // Both signals are ready before the resolver first looks at them.
        tx.send(()).expect("receiver alive");
        token.cancel();

        assert_eq!(resolve_payment(token, rx).await, PaymentStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_confirmation_sender_is_not_a_confirmation() {
        let token = CancellationToken::new();
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        assert_eq!(resolve_payment(token, rx).await, PaymentStatus::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn no_signal_means_no_return() {
        let token = CancellationToken::new();
        let (_tx, rx) = oneshot::channel::<()>();

        let outcome =
            tokio::time::timeout(Duration::from_millis(250), resolve_payment(token, rx)).await;
        assert!(outcome.is_err(), "resolver returned without any signal");
    }

    #[test]
    fn status_serialization() {
        let json = serde_json::to_string(&PaymentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");

        let json = serde_json::to_string(&PaymentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn status_display() {
        assert_eq!(PaymentStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(PaymentStatus::Cancelled.to_string(), "CANCELLED");
    }
}
