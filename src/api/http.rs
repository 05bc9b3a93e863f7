/*!
 * HTTP Endpoints
 * Thin axum transport over the profiler
 *
 * - GET /profiler/info       JSON history + extra info
 * - GET /profiler/info.html  charts page, or the "off" page with no history
 * - GET /profiler/start      start tracking, then redirect to the page
 * - GET /profiler/stop       stop tracking, then redirect to the page
 */

use super::presentation::HtmlPage;
use crate::core::errors::ProfilerResult;
use crate::core::limits::COMMAND_SETTLE_DELAY;
use crate::profiler::Profiler;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::time::Duration;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info};

pub const INFO_PATH: &str = "/profiler/info";
pub const INFO_HTML_PATH: &str = "/profiler/info.html";
pub const START_PATH: &str = "/profiler/start";
pub const STOP_PATH: &str = "/profiler/stop";

#[derive(Clone)]
struct AppState {
    profiler: Profiler,
    settle_delay: Duration,
}

/// Profiler routes with the default pause after start/stop
pub fn router(profiler: Profiler) -> Router {
    router_with_settle_delay(profiler, COMMAND_SETTLE_DELAY)
}

/// Profiler routes, pausing `settle_delay` before each start/stop redirect
pub fn router_with_settle_delay(profiler: Profiler, settle_delay: Duration) -> Router {
    Router::new()
        .route(INFO_PATH, get(info_json_handler))
        .route(INFO_HTML_PATH, get(info_html_handler))
        .route(START_PATH, get(start_handler))
        .route(STOP_PATH, get(stop_handler))
        .with_state(AppState {
            profiler,
            settle_delay,
        })
}

/// Mount the profiler routes next to an application's own routes
pub fn add_profiler_routes(app: Router, profiler: Profiler) -> Router {
    app.merge(router(profiler))
}

async fn info_json_handler(State(state): State<AppState>) -> Response {
    let info = state.profiler.info().await;
    match info.to_json() {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize profiling info");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn info_html_handler(State(state): State<AppState>) -> Html<&'static str> {
    let history = state.profiler.snapshot_history().await;
    let page = HtmlPage::for_history(&history);
    debug!(page = page.name(), samples = history.len(), "Serving profiler page");
    Html(page.content())
}

async fn start_handler(State(state): State<AppState>) -> Redirect {
    state.profiler.start_tracking();
    tokio::time::sleep(state.settle_delay).await;
    Redirect::temporary(INFO_HTML_PATH)
}

async fn stop_handler(State(state): State<AppState>) -> Redirect {
    state.profiler.stop_tracking();
    tokio::time::sleep(state.settle_delay).await;
    Redirect::temporary(INFO_HTML_PATH)
}

/// Bind `addr` and serve the profiler routes until `shutdown` resolves
pub async fn serve<A, F>(addr: A, profiler: Profiler, shutdown: F) -> ProfilerResult<()>
where
    A: ToSocketAddrs,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, profiler, shutdown).await
}

/// Serve the profiler routes on an already bound listener
pub async fn serve_listener<F>(
    listener: TcpListener,
    profiler: Profiler,
    shutdown: F,
) -> ProfilerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "Profiler endpoints listening");
    axum::serve(listener, router(profiler))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
