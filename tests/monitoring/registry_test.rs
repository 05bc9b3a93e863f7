/*!
 * Extra-Info Registry Tests
 */

use crate::common::{growing_source, profiler};
use heapscope::{ExtraInfo, ExtraInfoRegistry, Profiler, ProfilerConfig};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn single(key: &str, value: serde_json::Value) -> ExtraInfo {
    let mut info = ExtraInfo::new();
    info.insert(key.to_string(), value);
    info
}

#[tokio::test]
async fn test_no_provider_reports_null() {
    let profiler = profiler(10, 100);

    assert!(profiler.fetch_extra_info().is_empty());
    assert_eq!(profiler.info().await.extra_service_info, None);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_registered_provider_is_reported() {
    let profiler = profiler(10, 100);
    profiler.register_extra_info(|| single("k", json!("v")));

    assert_eq!(profiler.fetch_extra_info(), single("k", json!("v")));
    assert_eq!(
        profiler.info().await.extra_service_info,
        Some(single("k", json!("v")))
    );

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_later_registration_replaces_earlier() {
    let profiler = profiler(10, 100);
    profiler.register_extra_info(|| single("first", json!(1)));
    profiler.register_extra_info(|| single("second", json!(2)));

    assert_eq!(profiler.fetch_extra_info(), single("second", json!(2)));

    profiler.clear_extra_info();
    assert!(profiler.fetch_extra_info().is_empty());
    assert_eq!(profiler.info().await.extra_service_info, None);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_provider_called_on_every_fetch() {
    let profiler = profiler(10, 100);
    let calls = Arc::new(AtomicU64::new(0));
    {
        let calls = Arc::clone(&calls);
        profiler.register_extra_info(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            single("calls", json!(n))
        });
    }

    profiler.fetch_extra_info();
    let info = profiler.fetch_extra_info();
    assert_eq!(info["calls"], json!(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_shared_registry_across_profilers() {
    let registry = Arc::new(ExtraInfoRegistry::new());
    let config = ProfilerConfig::new(10, Duration::from_millis(100));

    let a = Profiler::with_registry(config.clone(), growing_source(), registry.clone()).unwrap();
    let b = Profiler::with_registry(config, growing_source(), registry.clone()).unwrap();

    a.register_extra_info(|| single("owner", json!("a")));
    assert_eq!(b.fetch_extra_info(), single("owner", json!("a")));
    assert!(registry.is_registered());

    a.shutdown().await;
    b.shutdown().await;
}
