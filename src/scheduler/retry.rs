use crate::{error::Error as JobTriggerError, scheduler::SchedulerJobRetryStrategy};
use std::future::Future;
use tracing::warn;

/// Runs the operation and retries it while it fails with a transient error, waiting between
/// attempts as the retry strategy dictates. Any other error is returned right away, and once all
/// attempts are exhausted the last error is returned. The operation receives the zero-based
/// attempt number.
pub async fn retry_transient<T, F, Fut>(
    retry_strategy: &SchedulerJobRetryStrategy,
    mut operation: F,
) -> Result<T, JobTriggerError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, JobTriggerError>>,
{
    let max_attempts = retry_strategy.max_attempts().max(1);
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Err(err) if err.kind().is_retryable() && attempt + 1 < max_attempts => {
                let retry_interval = retry_strategy.interval(attempt);
                warn!(
                    error.kind = %err.kind(),
                    "Attempt {} of {max_attempts} failed, retrying in {}: {err}",
                    attempt + 1,
                    humantime::format_duration(retry_interval)
                );
                tokio::time::sleep(retry_interval).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::retry_transient;
    use crate::{
        error::{Error, ErrorKind},
        scheduler::SchedulerJobRetryStrategy,
    };
    use anyhow::anyhow;
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    fn mock_retry_strategy() -> SchedulerJobRetryStrategy {
        SchedulerJobRetryStrategy::Exponential {
            initial_interval: Duration::from_millis(10),
            multiplier: 2,
            max_interval: Duration::from_millis(100),
            max_attempts: 3,
        }
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() -> anyhow::Result<()> {
        let attempts = AtomicU32::new(0);
        let result = retry_transient(&mock_retry_strategy(), |attempt| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(Error::transient_with_root_cause(anyhow!("Request timed out.")))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await?;

        assert_eq!(result, 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() -> anyhow::Result<()> {
        let attempts = AtomicU32::new(0);
        let error = retry_transient(&mock_retry_strategy(), |attempt| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                Err::<(), _>(Error::transient_with_root_cause(anyhow!(
                    "Attempt {attempt} timed out."
                )))
            }
        })
        .await
        .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::TransientFailure);
        assert_eq!(error.root_cause().to_string(), "Attempt 2 timed out.");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        Ok(())
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() -> anyhow::Result<()> {
        for error in [
            Error::invalid_configuration("Location cannot be empty."),
            Error::rejected_with_root_cause(anyhow!("Permission denied.")),
        ] {
            let kind = error.kind();
            let mut error = Some(error);
            let attempts = AtomicU32::new(0);
            let result = retry_transient(&mock_retry_strategy(), |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                let error = error.take();
                async move { error.map_or(Ok(()), Err) }
            })
            .await;

            assert_eq!(result.unwrap_err().kind(), kind);
            assert_eq!(attempts.load(Ordering::SeqCst), 1);
        }

        Ok(())
    }

    #[tokio::test]
    async fn always_makes_at_least_one_attempt() -> anyhow::Result<()> {
        let attempts = AtomicU32::new(0);
        let error = retry_transient(
            &SchedulerJobRetryStrategy::Constant {
                interval: Duration::from_millis(10),
                max_attempts: 0,
            },
            |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), _>(Error::transient_with_root_cause(anyhow!(
                        "Service unavailable."
                    )))
                }
            },
        )
        .await
        .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::TransientFailure);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);

        Ok(())
    }
}
