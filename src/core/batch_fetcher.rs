use crate::core::{BatchReport, DetailRecord, DetailSource, FetchOutcome, SkippedItem, Sleeper};
use crate::utils::error::{CatalogError, Result};
use futures::future::join_all;
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Fixed-delay retry budget for a single identifier.
///
/// `max_retries` counts additional attempts, so an item is tried at most
/// `max_retries + 1` times. Every kind of failure is retried the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fetches detail records in sequential groups of concurrent requests.
///
/// At most `batch_size` requests are outstanding at any time: a group only
/// starts once every attempt of the previous group, retries included, has
/// settled. Items that exhaust their retry budget are left out of the
/// result instead of failing the whole call.
pub struct BatchFetcher<S, Z = TokioSleeper> {
    source: S,
    sleeper: Z,
    batch_size: usize,
    policy: RetryPolicy,
}

impl<S: DetailSource> BatchFetcher<S, TokioSleeper> {
    pub fn new(source: S, batch_size: usize, policy: RetryPolicy) -> Result<Self> {
        if batch_size == 0 {
            return Err(CatalogError::InvalidConfigValueError {
                field: "batch_size".to_string(),
                value: batch_size.to_string(),
                reason: "Batch size must be at least 1".to_string(),
            });
        }

        Ok(Self {
            source,
            sleeper: TokioSleeper,
            batch_size,
            policy,
        })
    }

    pub fn with_defaults(source: S) -> Self {
        Self {
            source,
            sleeper: TokioSleeper,
            batch_size: DEFAULT_BATCH_SIZE,
            policy: RetryPolicy::default(),
        }
    }
}

impl<S: DetailSource, Z: Sleeper> BatchFetcher<S, Z> {
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> BatchFetcher<S, T> {
        BatchFetcher {
            source: self.source,
            sleeper,
            batch_size: self.batch_size,
            policy: self.policy,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn fetch_all(&self, identifiers: &[String]) -> Vec<DetailRecord> {
        self.fetch_all_with_report(identifiers).await.records
    }

    /// Same as [`fetch_all`](Self::fetch_all), but also returns the items
    /// that were dropped and why.
    pub async fn fetch_all_with_report(&self, identifiers: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        let total_batches = identifiers.len().div_ceil(self.batch_size);

        for (index, batch) in identifiers.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "Fetching batch {}/{} ({} items)",
                index + 1,
                total_batches,
                batch.len()
            );

            let outcomes = join_all(batch.iter().map(|id| self.fetch_one(id))).await;

            for outcome in outcomes {
                match outcome {
                    FetchOutcome::Fetched(record) => report.records.push(record),
                    FetchOutcome::Skipped(skipped) => report.skipped.push(skipped),
                }
            }
        }

        tracing::debug!(
            "Fetched {}/{} records ({} skipped)",
            report.records.len(),
            identifiers.len(),
            report.skipped.len()
        );

        report
    }

    pub async fn fetch_one(&self, identifier: &str) -> FetchOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.source.fetch_detail(identifier).await {
                Ok(record) => return FetchOutcome::Fetched(record),
                Err(e) if attempt >= max_attempts => {
                    tracing::warn!(
                        "Dropping '{}' after {} attempt(s): {}",
                        identifier,
                        attempt,
                        e
                    );
                    return FetchOutcome::Skipped(SkippedItem {
                        identifier: identifier.to_string(),
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        "Attempt {}/{} for '{}' failed: {}; retrying in {:?}",
                        attempt,
                        max_attempts,
                        identifier,
                        e,
                        self.policy.delay
                    );
                    self.sleeper.sleep(self.policy.delay).await;
                }
            }
        }
    }
}
