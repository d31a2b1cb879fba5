//! Fan-out/join and cancellation-aware background work.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs `job` once per index on scoped threads and waits for all of them.
pub fn run_parallel<F>(jobs: usize, job: F)
where
    F: Fn(usize) + Send + Sync,
{
    std::thread::scope(|scope| {
        let job = &job;
        for i in 0..jobs {
            scope.spawn(move || job(i));
        }
    });
}

/// Logs a liveness line every `interval` until the token is cancelled.
///
/// Returns the number of ticks observed. The first tick fires immediately.
pub async fn heartbeat_until_cancelled(
    id: usize,
    interval: Duration,
    token: CancellationToken,
) -> u64 {
    let mut timer = tokio::time::interval(interval);
    let mut ticks = 0;
    loop {
        tokio::select! {
            _ = timer.tick() => {
                ticks += 1;
                tracing::debug!(job = id, ticks, "job is alive");
            }
            _ = token.cancelled() => return ticks,
        }
    }
}
