/*!
 * heapscope demo service
 *
 * Serves a "Hello, World!" endpoint on one port and the profiler endpoints on
 * another, registering uptime and profiler hit counts as extra service info.
 *
 * Environment:
 * - HEAPSCOPE_LISTEN: profiler address (default 127.0.0.1:6060)
 * - HEAPSCOPE_APP_LISTEN: application address (default 127.0.0.1:8080)
 * - HEAPSCOPE_AUTOSTART: start tracking immediately when `1`/`true`
 */

use axum::{extract::Request, middleware::Next, response::Response, routing::get, Router};
use heapscope::api::http::{INFO_HTML_PATH, INFO_PATH};
use heapscope::core::limits::DEFAULT_LISTEN_ADDR;
use heapscope::{init_tracing, ExtraInfo, Profiler, ProfilerConfig};
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(not(all(feature = "jemalloc", not(target_env = "msvc"))))]
#[global_allocator]
static GLOBAL: heapscope::CountingAllocator = heapscope::CountingAllocator;

const DEFAULT_APP_ADDR: &str = "127.0.0.1:8080";

#[derive(Default)]
struct HitCounts {
    info: AtomicU64,
    info_html: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = ProfilerConfig::from_env()?;
    info!(
        capacity = config.history_capacity,
        interval_ms = config.sample_interval.as_millis() as u64,
        "Starting heapscope demo"
    );

    let profiler = Profiler::spawn(config)?;
    let hits = Arc::new(HitCounts::default());
    let started = Instant::now();

    {
        let hits = Arc::clone(&hits);
        profiler.register_extra_info(move || {
            let mut extra = ExtraInfo::new();
            extra.insert(
                "uptime".into(),
                format!("{}s", started.elapsed().as_secs()).into(),
            );
            extra.insert(
                format!("hit count: {}", INFO_HTML_PATH),
                hits.info_html.load(Ordering::Relaxed).into(),
            );
            extra.insert(
                format!("hit count: {}", INFO_PATH),
                hits.info.load(Ordering::Relaxed).into(),
            );
            extra
        });
    }

    if env_flag("HEAPSCOPE_AUTOSTART") {
        profiler.start_tracking();
    }

    let profiler_addr =
        std::env::var("HEAPSCOPE_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
    let app_addr =
        std::env::var("HEAPSCOPE_APP_LISTEN").unwrap_or_else(|_| DEFAULT_APP_ADDR.to_string());

    // Profiler on its own port, wrapped for hit tracking
    let counted = {
        let hits = Arc::clone(&hits);
        heapscope::api::router(profiler.clone()).layer(axum::middleware::from_fn(
            move |request: Request, next: Next| {
                let hits = Arc::clone(&hits);
                async move {
                    match request.uri().path() {
                        INFO_PATH => hits.info.fetch_add(1, Ordering::Relaxed),
                        INFO_HTML_PATH => hits.info_html.fetch_add(1, Ordering::Relaxed),
                        _ => 0,
                    };
                    let response: Response = next.run(request).await;
                    response
                }
            },
        ))
    };

    let profiler_listener = TcpListener::bind(&profiler_addr).await?;
    info!(addr = %profiler_addr, "Starting profiler");
    let profiler_server = tokio::spawn(async move {
        if let Err(e) = axum::serve(profiler_listener, counted)
            .with_graceful_shutdown(shutdown_signal())
            .await
        {
            error!(error = %e, "Profiler server error");
        }
    });

    let app = Router::new().route("/", get(|| async { "Hello, World!" }));
    let app_listener = TcpListener::bind(&app_addr).await?;
    info!(addr = %app_addr, "Starting service");
    axum::serve(app_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = profiler_server.await;
    profiler.shutdown().await;
    info!("heapscope demo stopped");
    Ok(())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
