/*!
 * Tracking Session
 * One sampler + one ring manager, sharing a single cancellation signal
 */

use crate::core::config::ProfilerConfig;
use crate::monitoring::metrics::MetricsCollector;
use crate::monitoring::ring::{spawn_ring_manager, HistoryReply, RingInputs};
use crate::monitoring::sampler::Sampler;
use crate::source::SharedSource;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Everything needed to open a session
#[derive(Clone)]
pub(crate) struct SessionSpec {
    pub config: ProfilerConfig,
    pub source: SharedSource,
    pub metrics: MetricsCollector,
}

pub(crate) struct TrackingSession {
    id: Uuid,
    cancel: watch::Sender<bool>,
    requests: mpsc::UnboundedSender<HistoryReply>,
    sampler: JoinHandle<()>,
    manager: JoinHandle<()>,
}

impl TrackingSession {
    /// Spawn both workers against a fresh ring
    pub(crate) fn open(spec: &SessionSpec) -> Self {
        let id = Uuid::new_v4();
        let (cancel, cancel_rx) = watch::channel(false);
        let (samples_tx, samples_rx) = flume::bounded(spec.config.intake_capacity);
        let (requests, requests_rx) = mpsc::unbounded_channel();

        let manager = spawn_ring_manager(
            id,
            spec.config.history_capacity,
            RingInputs {
                samples: samples_rx,
                requests: requests_rx,
                cancel: cancel_rx.clone(),
            },
        );

        let sampler = Sampler::new(
            spec.source.clone(),
            spec.config.sample_interval,
            spec.metrics.clone(),
        )
        .spawn(id, samples_tx, cancel_rx);

        spec.metrics.session_started();
        info!(
            session = %id,
            capacity = spec.config.history_capacity,
            interval_ms = spec.config.sample_interval.as_millis() as u64,
            "Started tracking memory"
        );

        Self {
            id,
            cancel,
            requests,
            sampler,
            manager,
        }
    }

    /// Hand a read to the ring manager unchanged
    pub(crate) fn forward(&self, reply: HistoryReply) {
        if let Err(mpsc::error::SendError(reply)) = self.requests.send(reply) {
            warn!(session = %self.id, "Ring manager gone, answering read with empty history");
            let _ = reply.send(Vec::new());
        }
    }

    /// Signal cancellation and wait for both workers to exit
    pub(crate) async fn close(self) {
        let _ = self.cancel.send(true);

        if let Err(e) = self.sampler.await {
            warn!(session = %self.id, error = %e, "Sampler task ended abnormally");
        }
        if let Err(e) = self.manager.await {
            warn!(session = %self.id, error = %e, "Ring manager task ended abnormally");
        }

        info!(session = %self.id, "Stopped tracking memory");
    }
}
