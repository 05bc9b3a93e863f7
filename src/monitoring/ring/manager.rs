/*!
 * Ring Manager
 * Single-owner task around one session's sample history
 *
 * The ring is moved into the task and never shared. Samples, history
 * requests and cancellation are multiplexed with `select!` and handled one
 * at a time, so a read can never observe a half-applied write.
 *
 * Priority: cancellation, then samples, then reads. Queued samples are
 * applied before a read is answered, so a burst of reads cannot back up the
 * intake. The sampler is rate-limited, so reads are never starved either.
 */

use super::buffer::RingBuffer;
use crate::core::types::TimedSample;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Reply slot carried by a history request
pub type HistoryReply = oneshot::Sender<Vec<TimedSample>>;

/// Channels feeding one ring manager
pub struct RingInputs {
    pub samples: flume::Receiver<TimedSample>,
    pub requests: mpsc::UnboundedReceiver<HistoryReply>,
    pub cancel: watch::Receiver<bool>,
}

/// Spawn the manager for a fresh ring of `capacity` samples
pub fn spawn_ring_manager(session: Uuid, capacity: usize, inputs: RingInputs) -> JoinHandle<()> {
    let ring = RingBuffer::new(capacity);
    tokio::spawn(run_ring_manager(session, ring, inputs))
}

async fn run_ring_manager(session: Uuid, mut ring: RingBuffer<TimedSample>, inputs: RingInputs) {
    let RingInputs {
        samples,
        mut requests,
        mut cancel,
    } = inputs;
    let mut intake_open = true;

    debug!(%session, capacity = ring.capacity(), "Ring manager started");

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit signal and when the session drops its sender
            _ = cancel.changed() => break,

            sample = samples.recv_async(), if intake_open => match sample {
                Ok(sample) => ring.push(sample),
                Err(_) => {
                    debug!(%session, "Sampler intake closed");
                    intake_open = false;
                }
            },

            Some(reply) = requests.recv() => {
                // Requester may have given up; nothing to do then
                let _ = reply.send(ring.to_vec());
            }
        }
    }

    // Answer reads that were forwarded before the stop was processed
    let mut drained = 0usize;
    while let Ok(reply) = requests.try_recv() {
        let _ = reply.send(ring.to_vec());
        drained += 1;
    }

    info!(
        %session,
        retained = ring.len(),
        drained_requests = drained,
        "Ring manager stopped"
    );
}
