//! Module providing a periodic polling loop for a single [`Consumer`].

use super::{consumer::Consumer, Error, Record, Transport};
use std::{num::NonZeroUsize, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Counters describing a completed [`PollingDriver::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub polls: u64,
    pub batches: u64,
    pub empty: u64,
    pub failures: u64,
}

/// Owns a [`Consumer`] and polls it on a fixed period until cancelled.
///
/// Polls are strictly sequential. A failed poll is logged and retried on the next tick from
/// the same offset, unless a consecutive failure limit is configured and reached.
pub struct PollingDriver<T> {
    consumer: Consumer<T>,
    interval: Duration,
    max_consecutive_failures: Option<NonZeroUsize>,
}

impl<T> PollingDriver<T> {
    /// Fails with [`Error::ZeroPollInterval`] when `interval` is zero.
    pub fn new(consumer: Consumer<T>, interval: Duration) -> Result<Self, Error> {
        if interval.is_zero() {
            return Err(Error::ZeroPollInterval);
        }

        Ok(Self {
            consumer,
            interval,
            max_consecutive_failures: None,
        })
    }

    pub fn with_max_consecutive_failures(mut self, limit: NonZeroUsize) -> Self {
        self.max_consecutive_failures = Some(limit);
        self
    }

    pub fn consumer(&self) -> &Consumer<T> {
        &self.consumer
    }

    pub fn into_consumer(self) -> Consumer<T> {
        self.consumer
    }
}

impl<T: Transport> PollingDriver<T> {
    /// Polls every `interval` (the first poll happens immediately), handing delivered records
    /// to `handler`, until `token` is cancelled.
    ///
    /// Cancellation also aborts an in-flight fetch; the cursor only moves once a fetch has
    /// completed, so an aborted poll leaves it untouched.
    ///
    /// Returns the run's counters, or the last error once the consecutive failure limit is
    /// reached.
    pub async fn run<F>(
        &mut self,
        token: &CancellationToken,
        mut handler: F,
    ) -> Result<PollStats, Error>
    where
        F: FnMut(&Record),
    {
        let span = info_span!("polling_driver", topic = %self.consumer.topic());

        async {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut stats = PollStats::default();
            let mut consecutive_failures = 0;

            info!(next_offset = self.consumer.next_offset(), "Polling started.");

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    result = self.consumer.poll_with(&mut handler) => result,
                };

                stats.polls += 1;

                match result {
                    Ok(true) => {
                        stats.batches += 1;
                        consecutive_failures = 0;
                    }
                    Ok(false) => {
                        stats.empty += 1;
                        consecutive_failures = 0;
                        info!("No new messages...");
                    }
                    Err(err) => {
                        stats.failures += 1;
                        consecutive_failures += 1;

                        error!(
                            error = %err,
                            retryable = err.is_retryable(),
                            next_offset = self.consumer.next_offset(),
                            "Poll failed."
                        );

                        if let Some(limit) = self.max_consecutive_failures {
                            if consecutive_failures >= limit.get() {
                                error!(consecutive_failures, "Giving up on polling.");
                                return Err(err);
                            }
                        }
                    }
                }
            }

            info!(?stats, next_offset = self.consumer.next_offset(), "Polling stopped.");

            Ok(stats)
        }
        .instrument(span)
        .await
    }
}
