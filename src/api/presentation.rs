/*!
 * Presentation
 * Display units and payloads for the profiler endpoints
 */

use crate::core::errors::ProfilerResult;
use crate::core::limits::BYTES_PER_KB;
use crate::core::types::{EpochMillis, TimedSample};
use crate::monitoring::ExtraInfo;
use serde::{Deserialize, Serialize};

const INFO_HTML: &str = include_str!("../../assets/info.html");
const INFO_OFF_HTML: &str = include_str!("../../assets/info-off.html");

/// One sample in display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeapMemStat {
    /// Milliseconds relative to the time of the request (zero or negative)
    pub time_ms_ago: i64,
    pub sys_kb: u64,
    pub heap_sys_kb: u64,
    pub heap_alloc_kb: u64,
    pub heap_idle_kb: u64,
    pub heap_released_kb: u64,
}

impl HeapMemStat {
    pub fn from_sample(sample: &TimedSample, now_ms: EpochMillis) -> Self {
        let stats = &sample.mem_stats;
        Self {
            time_ms_ago: (sample.time_epoch_ms - now_ms).min(0),
            sys_kb: stats.sys / BYTES_PER_KB,
            heap_sys_kb: stats.heap_sys / BYTES_PER_KB,
            heap_alloc_kb: stats.heap_alloc / BYTES_PER_KB,
            heap_idle_kb: stats.heap_idle / BYTES_PER_KB,
            heap_released_kb: stats.heap_released / BYTES_PER_KB,
        }
    }
}

/// Convert a history, keeping its order
pub fn to_heap_mem_stats(history: &[TimedSample], now_ms: EpochMillis) -> Vec<HeapMemStat> {
    history
        .iter()
        .map(|sample| HeapMemStat::from_sample(sample, now_ms))
        .collect()
}

/// Body of the JSON info endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfilingInfo {
    pub heap_info: Vec<HeapMemStat>,
    /// `null` when the host registered no provider
    pub extra_service_info: Option<ExtraInfo>,
}

impl ProfilingInfo {
    pub fn to_json(&self) -> ProfilerResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Static pages served by the HTML endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlPage {
    /// Live charts, shown while history exists
    Info,
    /// Shown when nothing is being tracked
    InfoOff,
}

impl HtmlPage {
    /// The page for a given history
    pub fn for_history(history: &[TimedSample]) -> Self {
        if history.is_empty() {
            Self::InfoOff
        } else {
            Self::Info
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Info => "info.html",
            Self::InfoOff => "info-off.html",
        }
    }

    pub fn content(self) -> &'static str {
        match self {
            Self::Info => INFO_HTML,
            Self::InfoOff => INFO_OFF_HTML,
        }
    }
}
