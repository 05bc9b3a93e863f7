/*!
 * Profiler
 * Entry point handed to the hosting application and the HTTP layer
 *
 * Cheap to clone; all clones drive the same controller and registry.
 */

use crate::api::presentation::{to_heap_mem_stats, ProfilingInfo};
use crate::core::config::ProfilerConfig;
use crate::core::errors::{ProfilerError, ProfilerResult};
use crate::core::types::{now_epoch_ms, TimedSample};
use crate::monitoring::tracking::SessionSpec;
use crate::monitoring::{
    ExtraInfo, ExtraInfoRegistry, MetricsCollector, MetricsSnapshot, TrackingController,
};
use crate::source::{default_source, SharedSource};
use std::sync::Arc;
use tokio::runtime::Handle;

#[derive(Clone)]
pub struct Profiler {
    controller: Arc<TrackingController>,
    registry: Arc<ExtraInfoRegistry>,
    metrics: MetricsCollector,
    config: ProfilerConfig,
}

impl Profiler {
    /// Spawn with the source matching the compiled-in allocator
    ///
    /// Fails with `NoRuntime` outside a tokio runtime.
    pub fn spawn(config: ProfilerConfig) -> ProfilerResult<Self> {
        Self::with_source(config, default_source())
    }

    /// Spawn reading statistics from `source`
    pub fn with_source(config: ProfilerConfig, source: SharedSource) -> ProfilerResult<Self> {
        Self::with_registry(config, source, Arc::new(ExtraInfoRegistry::new()))
    }

    /// Spawn sharing an existing extra-info registry
    pub fn with_registry(
        config: ProfilerConfig,
        source: SharedSource,
        registry: Arc<ExtraInfoRegistry>,
    ) -> ProfilerResult<Self> {
        config.validate()?;
        Handle::try_current().map_err(|e| ProfilerError::NoRuntime(e.to_string()))?;

        let metrics = MetricsCollector::new();
        let controller = TrackingController::spawn(SessionSpec {
            config: config.clone(),
            source,
            metrics: metrics.clone(),
        });

        Ok(Self {
            controller: Arc::new(controller),
            registry,
            metrics,
            config,
        })
    }

    pub fn start_tracking(&self) {
        self.controller.start_tracking();
    }

    pub fn stop_tracking(&self) {
        self.controller.stop_tracking();
    }

    /// Retained samples, oldest first; empty when not tracking
    pub async fn snapshot_history(&self) -> Vec<TimedSample> {
        self.controller.snapshot_history().await
    }

    /// Blocking variant for callers outside the runtime
    pub fn blocking_snapshot_history(&self) -> Vec<TimedSample> {
        self.controller.blocking_snapshot_history()
    }

    /// Replace the diagnostic info provider
    pub fn register_extra_info<F>(&self, provider: F)
    where
        F: Fn() -> ExtraInfo + Send + Sync + 'static,
    {
        self.registry.register(provider);
    }

    pub fn clear_extra_info(&self) {
        self.registry.clear();
    }

    /// Current diagnostic info; empty when no provider is registered
    pub fn fetch_extra_info(&self) -> ExtraInfo {
        self.registry.fetch()
    }

    /// History in display units plus extra info
    pub async fn info(&self) -> ProfilingInfo {
        let history = self.snapshot_history().await;
        ProfilingInfo {
            heap_info: to_heap_mem_stats(&history, now_epoch_ms()),
            extra_service_info: self.registry.fetch_optional(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ExtraInfoRegistry> {
        &self.registry
    }

    /// Stop any session and the controller task
    pub async fn shutdown(&self) {
        self.controller.shutdown().await;
    }
}

impl std::fmt::Debug for Profiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiler")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}
