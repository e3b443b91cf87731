//! Timeout wrapper for port calls.

use std::future::Future;
use std::time::Duration;

use super::DataUnavailable;

/// Run a port call under `timeout`, mapping expiry to [`DataUnavailable::Timeout`].
pub async fn with_timeout<T, F>(
    timeout: Duration,
    operation: &str,
    call: F,
) -> Result<T, DataUnavailable>
where
    F: Future<Output = Result<T, DataUnavailable>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!(operation, timeout_ms = timeout.as_millis() as u64, "Data call timed out");
            Err(DataUnavailable::Timeout {
                operation: operation.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let result = with_timeout(Duration::from_millis(100), "get_quote", async { Ok(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let result: Result<u32, _> = with_timeout(Duration::from_millis(10), "get_bars", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(1)
        })
        .await;
        assert_eq!(
            result,
            Err(DataUnavailable::Timeout {
                operation: "get_bars".into()
            })
        );
    }

    #[tokio::test]
    async fn test_inner_error_preserved() {
        let result: Result<u32, _> = with_timeout(Duration::from_millis(100), "get_sector", async {
            Err(DataUnavailable::Unsupported)
        })
        .await;
        assert_eq!(result, Err(DataUnavailable::Unsupported));
    }
}
