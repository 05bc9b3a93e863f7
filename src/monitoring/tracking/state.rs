/*!
 * Tracking State Machine
 *
 * Idle  + Start → Tracking (open a session)
 * Tracking + Start → Tracking (no-op)
 * Tracking + Stop  → Idle (close the session)
 * Idle  + Stop  → Idle (no-op)
 *
 * Reads: Idle answers empty, Tracking forwards to the session.
 */

use super::session::{SessionSpec, TrackingSession};
use crate::monitoring::ring::HistoryReply;
use tracing::debug;

/// Lifecycle commands accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
}

/// Whether a session is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Tracking,
}

/// Effect of a command in a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open,
    Close,
    Stay,
}

/// Where a history read goes in a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadRoute {
    AnswerEmpty,
    Forward,
}

/// Transition table
pub const fn transition(phase: Phase, command: Command) -> Transition {
    match (phase, command) {
        (Phase::Idle, Command::Start) => Transition::Open,
        (Phase::Tracking, Command::Stop) => Transition::Close,
        (Phase::Tracking, Command::Start) | (Phase::Idle, Command::Stop) => Transition::Stay,
    }
}

/// Read routing table
pub const fn route_read(phase: Phase) -> ReadRoute {
    match phase {
        Phase::Idle => ReadRoute::AnswerEmpty,
        Phase::Tracking => ReadRoute::Forward,
    }
}

/// Controller-owned state; holds the live session while tracking
pub(crate) enum TrackingState {
    Idle,
    Tracking(TrackingSession),
}

impl TrackingState {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Tracking(_) => Phase::Tracking,
        }
    }

    pub(crate) async fn apply(&mut self, command: Command, spec: &SessionSpec) {
        match transition(self.phase(), command) {
            Transition::Open => {
                *self = Self::Tracking(TrackingSession::open(spec));
            }
            Transition::Close => {
                if let Self::Tracking(session) = std::mem::replace(self, Self::Idle) {
                    session.close().await;
                }
            }
            Transition::Stay => {
                debug!(?command, phase = ?self.phase(), "Command is a no-op in current phase");
            }
        }
    }

    pub(crate) fn read(&self, reply: HistoryReply) {
        match (route_read(self.phase()), self) {
            (ReadRoute::Forward, Self::Tracking(session)) => session.forward(reply),
            _ => {
                let _ = reply.send(Vec::new());
            }
        }
    }
}
