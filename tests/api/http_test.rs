/*!
 * HTTP Endpoint Tests
 * Drives the router in-process with `tower::ServiceExt::oneshot`
 */

use crate::common::profiler;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use heapscope::api::http::{INFO_HTML_PATH, INFO_PATH, START_PATH, STOP_PATH};
use heapscope::api::{router_with_settle_delay, HtmlPage};
use heapscope::{Profiler, ProfilingInfo};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

fn app(profiler: &Profiler) -> Router {
    router_with_settle_delay(profiler.clone(), Duration::ZERO)
}

async fn get(profiler: &Profiler, path: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app(profiler)
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_info(profiler: &Profiler) -> ProfilingInfo {
    let (status, headers, body) = get(profiler, INFO_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_idle_info_is_empty() {
    let profiler = profiler(10, 100);

    let (_, _, body) = get(&profiler, INFO_PATH).await;
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, json!({ "HeapInfo": [], "ExtraServiceInfo": null }));

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_idle_html_is_off_page() {
    let profiler = profiler(10, 100);

    let (status, _, body) = get(&profiler, INFO_HTML_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), HtmlPage::InfoOff.content());

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_redirects_and_fills_history() {
    let profiler = profiler(10, 100);

    let (status, headers, _) = get(&profiler, START_PATH).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], INFO_HTML_PATH);

    tokio::time::sleep(Duration::from_millis(350)).await;

    let info = get_info(&profiler).await;
    assert_eq!(info.heap_info.len(), 3);
    assert!(info.heap_info.iter().all(|stat| stat.time_ms_ago <= 0));

    let allocs: Vec<u64> = info.heap_info.iter().map(|s| s.heap_alloc_kb).collect();
    assert_eq!(allocs, vec![1, 2, 3]);

    let (_, _, body) = get(&profiler, INFO_HTML_PATH).await;
    assert_eq!(String::from_utf8(body).unwrap(), HtmlPage::Info.content());

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_redirects_and_clears_history() {
    let profiler = profiler(10, 100);
    get(&profiler, START_PATH).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(get_info(&profiler).await.heap_info.len(), 2);

    let (status, headers, _) = get(&profiler, STOP_PATH).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], INFO_HTML_PATH);

    assert!(get_info(&profiler).await.heap_info.is_empty());

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_extra_info_in_payload() {
    let profiler = profiler(10, 100);
    profiler.register_extra_info(|| {
        let mut extra = heapscope::ExtraInfo::new();
        extra.insert("build".into(), json!("abc123"));
        extra
    });

    let info = get_info(&profiler).await;
    let extra = info.extra_service_info.expect("provider registered");
    assert_eq!(extra["build"], json!("abc123"));

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_routes_merge_into_application() {
    let profiler = profiler(10, 100);
    let app = heapscope::api::add_profiler_routes(
        Router::new().route("/", axum::routing::get(|| async { "Hello, World!" })),
        profiler.clone(),
    );

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri(INFO_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let profiler = profiler(10, 100);
    let (status, _, _) = get(&profiler, "/profiler/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    profiler.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_serve_listener_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    let profiler = profiler(10, 100);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(heapscope::api::serve_listener(
        listener,
        profiler.clone(),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /profiler/info HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.ends_with(r#"{"HeapInfo":[],"ExtraServiceInfo":null}"#), "{}", response);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
    profiler.shutdown().await;
}
