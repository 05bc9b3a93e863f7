/*!
 * Profiler Limits and Constants
 *
 * Centralized location for history sizes, intervals and queue depths.
 */

use std::time::Duration;

// =============================================================================
// HISTORY
// =============================================================================

/// Samples taken per second in the reference configuration
pub const SAMPLES_PER_SECOND: u64 = 2;

/// Seconds of history kept in the reference configuration
pub const HISTORY_SECONDS: u64 = 60;

/// Ring capacity for the reference configuration (60s at 2Hz)
pub const DEFAULT_HISTORY_CAPACITY: usize = (HISTORY_SECONDS * SAMPLES_PER_SECOND) as usize;

/// Interval between samples in the reference configuration (500ms)
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(1000 / SAMPLES_PER_SECOND);

/// Upper bound on ring capacity
/// A day of history at 2Hz; keeps a history read well under a few MB
pub const MAX_HISTORY_CAPACITY: usize = 24 * 60 * 60 * 2;

/// Lower bound on the sampling interval
/// Matches the stamp resolution; `MonotonicStamper` keeps 1ms ticks ordered
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

// =============================================================================
// QUEUES
// =============================================================================

/// Sampler → ring manager intake depth
/// Smooths the moments when the manager is busy copying a history out
pub const DEFAULT_INTAKE_CAPACITY: usize = 20;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Pause after a start/stop command before redirecting
/// Gives the first samples a chance to land before the page reloads
pub const COMMAND_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Default listen address of the demo service
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:6060";

/// Bytes per kilobyte in the presentation layer (decimal kB)
pub const BYTES_PER_KB: u64 = 1000;
