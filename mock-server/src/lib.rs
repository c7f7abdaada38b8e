use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/headers", any(echo_headers))
        .route("/sleep/{secs}", any(sleep))
        .route("/method", any(method))
        .route("/bytes/{len}", any(bytes))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"a":1}"#,
    )
}

/// Reply 201 with the request body and content type unchanged.
async fn echo(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    tracing::debug!(bytes = body.len(), ?content_type, "echo");
    (StatusCode::CREATED, [(header::CONTENT_TYPE, content_type)], body)
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (
            status,
            [("x-mock-status", code.to_string())],
            format!("status {code}"),
        )
            .into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")).into_response(),
    }
}

/// Every `x-` request header as `[name, value]` pairs, in arrival order.
async fn echo_headers(headers: HeaderMap) -> Json<Vec<(String, String)>> {
    let pairs = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-"))
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(pairs)
}

async fn sleep(Path(secs): Path<u64>) -> String {
    tracing::debug!(secs, "sleeping before reply");
    tokio::time::sleep(Duration::from_secs(secs)).await;
    format!("slept {secs}")
}

async fn method(method: Method) -> String {
    method.to_string()
}

/// A body of `len` ASCII `a` bytes.
async fn bytes(Path(len): Path<usize>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "a".repeat(len),
    )
}
