/*!
 * Sampler
 * Timer-driven worker feeding a session's ring manager
 *
 * Overflow policy: the intake queue is bounded and the sampler never waits on
 * it. A full queue drops the new sample, bumps `samples_dropped` and logs a
 * warning.
 *
 * Stamps come from a per-session `MonotonicStamper`, so a session's history
 * is strictly increasing even at a 1ms interval or across a wall-clock step.
 */

use crate::core::types::{MonotonicStamper, TimedSample};
use crate::monitoring::metrics::MetricsCollector;
use crate::source::SharedSource;
use flume::TrySendError;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Periodic reader of one snapshot source
#[derive(Clone)]
pub struct Sampler {
    source: SharedSource,
    interval: Duration,
    metrics: MetricsCollector,
}

impl Sampler {
    pub fn new(source: SharedSource, interval: Duration, metrics: MetricsCollector) -> Self {
        Self {
            source,
            interval,
            metrics,
        }
    }

    /// Take one reading and stamp it
    pub fn sample_once(&self, stamper: &mut MonotonicStamper) -> Option<TimedSample> {
        match self.source.read() {
            Ok(stats) => Some(TimedSample::new(stamper.stamp(), stats)),
            Err(e) => {
                self.metrics.snapshot_failed();
                warn!(error = %e, "Snapshot read failed, skipping tick");
                None
            }
        }
    }

    /// Run until `cancel` fires or the intake is closed
    ///
    /// The first reading is taken one full interval after spawning.
    pub fn spawn(
        self,
        session: Uuid,
        intake: flume::Sender<TimedSample>,
        cancel: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(session, intake, cancel))
    }

    async fn run(
        self,
        session: Uuid,
        intake: flume::Sender<TimedSample>,
        mut cancel: watch::Receiver<bool>,
    ) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stamper = MonotonicStamper::new();

        debug!(%session, interval_ms = self.interval.as_millis() as u64, "Sampler started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.changed() => break,

                _ = ticker.tick() => {
                    let Some(sample) = self.sample_once(&mut stamper) else {
                        continue;
                    };

                    match intake.try_send(sample) {
                        Ok(()) => {
                            self.metrics.sample_taken();
                            trace!(%session, at = sample.time_epoch_ms, "Sample queued");
                        }
                        Err(TrySendError::Full(_)) => {
                            let dropped = self.metrics.sample_dropped();
                            warn!(
                                %session,
                                dropped_total = dropped,
                                "Sample intake full, dropping newest sample"
                            );
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            debug!(%session, "Ring manager gone, sampler exiting");
                            break;
                        }
                    }
                }
            }
        }

        debug!(%session, "Sampler stopped");
    }
}
