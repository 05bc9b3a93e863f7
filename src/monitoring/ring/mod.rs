/*!
 * Sample History
 * Ring buffer plus the task that owns it
 */

mod buffer;
mod manager;

pub use buffer::RingBuffer;
pub use manager::{spawn_ring_manager, HistoryReply, RingInputs};
