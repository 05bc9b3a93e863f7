/*!
 * Memory Monitoring
 * Sampling workers, history, session control and diagnostics registry
 */

mod metrics;
mod registry;
mod sampler;
mod tracer;

pub mod ring;
pub mod tracking;

pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use registry::{ExtraInfo, ExtraInfoProvider, ExtraInfoRegistry};
pub use sampler::Sampler;
pub use tracer::{init_tracing, ENV_TRACE_JSON};
pub use tracking::{Command, Phase, TrackingController};
