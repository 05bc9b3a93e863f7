/*!
 * Tracking
 * Start/stop controller and the sessions it owns
 */

mod controller;
mod session;
mod state;

pub use controller::{ControlMessage, TrackingController};
pub(crate) use session::SessionSpec;
pub use state::{route_read, transition, Command, Phase, ReadRoute, Transition};
