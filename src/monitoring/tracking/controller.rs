/*!
 * Tracking Controller - Session Lifecycle Actor
 *
 * Persistent background task that owns the tracking state. Start/stop
 * commands and history reads share one FIFO inbox and are processed one at a
 * time, so:
 * - a Start racing a Stop resolves in arrival order
 * - a read queued before a Stop is answered by the live session (the ring
 *   manager drains forwarded reads before it exits)
 * - a read queued after a Stop sees `Idle` and gets an empty history
 *
 * # Shutdown
 *
 * Graceful-with-fallback:
 * 1. `shutdown().await` closes any active session and joins the task
 * 2. Dropping the last handle without shutdown aborts the task (with a warning)
 */

use super::session::SessionSpec;
use super::state::{Command, TrackingState};
use crate::core::types::TimedSample;
use crate::monitoring::ring::HistoryReply;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Messages accepted by the controller task
#[derive(Debug)]
pub enum ControlMessage {
    /// Start or stop tracking
    Command(Command),
    /// Request the current history
    History(HistoryReply),
    /// Close any active session and exit
    Shutdown,
}

/// Handle to the controller background task
pub struct TrackingController {
    command_tx: mpsc::UnboundedSender<ControlMessage>,
    handle: Mutex<Option<JoinHandle<()>>>,
    /// Tracks whether graceful shutdown was initiated (lock-free)
    shutdown_initiated: AtomicBool,
}

impl TrackingController {
    /// Spawn the controller in the `Idle` state
    pub(crate) fn spawn(spec: SessionSpec) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_controller_loop(spec, command_rx));

        info!("Tracking controller spawned");

        Self {
            command_tx,
            handle: Mutex::new(Some(handle)),
            shutdown_initiated: AtomicBool::new(false),
        }
    }

    /// Begin tracking if not already; returns once the command is queued
    pub fn start_tracking(&self) {
        self.send(ControlMessage::Command(Command::Start));
    }

    /// Stop tracking if active; returns once the command is queued
    pub fn stop_tracking(&self) {
        self.send(ControlMessage::Command(Command::Stop));
    }

    /// Most recent samples, oldest first; empty when not tracking
    pub async fn snapshot_history(&self) -> Vec<TimedSample> {
        match self.request_history() {
            Some(reply) => reply.await.unwrap_or_else(|_| {
                warn!("History request dropped without an answer");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Blocking variant of [`snapshot_history`](Self::snapshot_history)
    ///
    /// For synchronous callers; must not be called from inside the runtime.
    pub fn blocking_snapshot_history(&self) -> Vec<TimedSample> {
        match self.request_history() {
            Some(reply) => reply.blocking_recv().unwrap_or_else(|_| {
                warn!("History request dropped without an answer");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    fn request_history(&self) -> Option<oneshot::Receiver<Vec<TimedSample>>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.command_tx.send(ControlMessage::History(reply_tx)).is_err() {
            warn!("Tracking controller not running, returning empty history");
            return None;
        }
        Some(reply_rx)
    }

    fn send(&self, message: ControlMessage) {
        if let Err(e) = self.command_tx.send(message) {
            warn!(message = ?e.0, "Tracking controller not running, command ignored");
        }
    }

    /// Shutdown the controller gracefully
    ///
    /// Closes any active session and waits for the task to finish. Later
    /// calls return immediately.
    pub async fn shutdown(&self) {
        // Mark shutdown as initiated (prevents abort in Drop)
        self.shutdown_initiated.store(true, Ordering::SeqCst);

        let _ = self.command_tx.send(ControlMessage::Shutdown);

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Tracking controller shutdown error");
            } else {
                info!("Tracking controller shutdown complete");
            }
        }
    }
}

/// Core controller loop
async fn run_controller_loop(
    spec: SessionSpec,
    mut command_rx: mpsc::UnboundedReceiver<ControlMessage>,
) {
    let mut state = TrackingState::Idle;

    while let Some(message) = command_rx.recv().await {
        match message {
            ControlMessage::Command(command) => state.apply(command, &spec).await,
            ControlMessage::History(reply) => state.read(reply),
            ControlMessage::Shutdown => {
                info!("Tracking controller shutting down");
                break;
            }
        }
    }

    // Also reached when every handle is gone
    state.apply(Command::Stop, &spec).await;
}

impl Drop for TrackingController {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        // Fallback path: graceful shutdown wasn't called
        if let Some(handle) = self.handle.get_mut().take() {
            warn!(
                "TrackingController dropped without calling shutdown() - aborting task immediately. \
                 Use `shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}
