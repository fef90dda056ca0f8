use anyhow::Error;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Runs `operation` until it succeeds, at most `1 + retries` times, sleeping
/// `delay_ms` between attempts. The last error is returned if every attempt fails.
pub async fn with_retry<F, Fut, T, E>(mut operation: F, retries: usize, delay_ms: u64) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Error>,
{
    let mut attempt = 0;
    loop {
        let err: Error = match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => err.into(),
        };
        if attempt >= retries {
            return Err(err);
        }
        attempt += 1;
        debug!(
            "Attempt {}/{} failed: {}. Retrying in {}ms...",
            attempt,
            retries + 1,
            err,
            delay_ms
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
