/*!
 * API Layer
 * Presentation of the sampled history and its HTTP transport
 */

pub mod http;
pub mod presentation;

pub use http::{add_profiler_routes, router, router_with_settle_delay, serve, serve_listener};
pub use presentation::{to_heap_mem_stats, HeapMemStat, HtmlPage, ProfilingInfo};
