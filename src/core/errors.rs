/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot source errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SnapshotError {
    #[error("Allocator statistics unavailable: {0}")]
    #[diagnostic(
        code(snapshot::unavailable),
        help("The allocator does not expose statistics. Install the matching global allocator.")
    )]
    Unavailable(String),

    #[error("Failed to read allocator statistics: {0}")]
    #[diagnostic(
        code(snapshot::read_failed),
        help("The read is retried on the next sampling tick.")
    )]
    ReadFailed(String),
}

/// Unified profiler error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum ProfilerError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(profiler::invalid_config),
        help("History capacity, sample interval and intake capacity must all be non-zero.")
    )]
    InvalidConfig(String),

    #[error("No tokio runtime: {0}")]
    #[diagnostic(
        code(profiler::no_runtime),
        help("Create the profiler from inside a tokio runtime, e.g. under #[tokio::main].")
    )]
    NoRuntime(String),

    #[error("Snapshot error: {0}")]
    #[diagnostic(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(profiler::serialization))]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(profiler::io))]
    Io(#[from] std::io::Error),
}

/// Common result type for profiler operations
pub type ProfilerResult<T> = Result<T, ProfilerError>;
