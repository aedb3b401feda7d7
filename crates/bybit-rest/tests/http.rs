//! Integration tests for the reqwest transport using a mock Axum server.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bybit_auth::hmac_sha256_hex;
use bybit_rest::{
    BybitRestClient, ClientConfig, Credentials, ErrorKind, HttpRequest, HttpTransport, Method,
    OrderRequest, Params, ReqwestTransport, RestError, RestResult, Side,
};
use bybit_types::TESTNET_REST_URL;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::sync::Mutex;

const SECRET: &str = "test_secret";

#[derive(Default)]
struct TestServerState {
    request_count: AtomicUsize,
    last_query: Mutex<Option<HashMap<String, String>>>,
    last_content_type: Mutex<Option<String>>,
}

async fn create_order(
    State(state): State<Arc<TestServerState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    *state.last_content_type.lock().await = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_query.lock().await = Some(params);

    Json(json!({
        "ret_code": 0,
        "ret_msg": "ok",
        "ext_code": "",
        "result": {"order_id": "335fd977-e5a5-4781-b6d0-c772d5bfb95b", "order_status": "Created"},
        "time_now": "1542434791.000000"
    }))
}

async fn leverage_rejected(State(state): State<Arc<TestServerState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::BAD_REQUEST,
        [("x-bapi-limit-status", "99")],
        r#"{"ret_code":10001,"ret_msg":"params error"}"#,
    )
}

async fn plain_text(State(state): State<Arc<TestServerState>>) -> &'static str {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    "pong"
}

async fn slow(State(state): State<Arc<TestServerState>>) -> Json<Value> {
    state.request_count.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({"ret_code": 0}))
}

fn create_router(state: Arc<TestServerState>) -> Router {
    Router::new()
        .route("/open-api/order/create", post(create_order))
        .route("/user/leverage", get(leverage_rejected))
        .route("/v2/public/symbols", get(plain_text))
        .route("/position/list", get(slow))
        .with_state(state)
}

async fn start_server(state: Arc<TestServerState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    format!("http://{addr}")
}

/// Sends requests meant for testnet to the local server instead
struct Redirect {
    inner: ReqwestTransport,
    base_url: String,
}

#[async_trait]
impl HttpTransport for Redirect {
    async fn send(&self, mut request: HttpRequest) -> RestResult<Value> {
        request.url = request.url.replacen(TESTNET_REST_URL, &self.base_url, 1);
        self.inner.send(request).await
    }
}

fn client_for(base_url: String, timeout_ms: u64) -> BybitRestClient {
    let transport = Redirect {
        inner: ReqwestTransport::new("bybit-rest-tests").unwrap(),
        base_url,
    };
    BybitRestClient::with_transport(
        Credentials::new("test_key", SECRET),
        ClientConfig::new().with_timeout_ms(timeout_ms),
        Arc::new(transport),
    )
}

#[tokio::test]
async fn test_place_order_signature_verifies_server_side() {
    let state = Arc::new(TestServerState::default());
    let client = client_for(start_server(state.clone()).await, 5000);

    let order = OrderRequest::limit("BTCUSD", Side::Buy, 1, dec!(9000));
    let payload = client.place_order(&order).await.unwrap();

    assert_eq!(payload["ret_code"], 0);
    assert_eq!(payload["result"]["order_status"], "Created");
    assert_eq!(state.request_count.load(Ordering::SeqCst), 1);
    assert_eq!(
        state.last_content_type.lock().await.as_deref(),
        Some("application/json")
    );

    let mut query = state.last_query.lock().await.clone().unwrap();
    let sign = query.remove("sign").unwrap();
    assert_eq!(query.get("api_key").map(String::as_str), Some("test_key"));
    assert_eq!(query.get("order_type").map(String::as_str), Some("Limit"));
    assert_eq!(query.get("price").map(String::as_str), Some("9000"));

    let mut pairs: Vec<_> = query.iter().collect();
    pairs.sort();
    let message = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    assert!(message.starts_with("api_key=test_key&order_type=Limit&price=9000&qty=1&side=Buy"));
    assert_eq!(sign, hmac_sha256_hex(SECRET.as_bytes(), &message));
}

#[tokio::test]
async fn test_non_2xx_is_server_error() {
    let state = Arc::new(TestServerState::default());
    let client = client_for(start_server(state.clone()).await, 5000);

    let err = client.get_leverage(Params::new()).await.unwrap_err();

    match &err {
        RestError::Server {
            status,
            body,
            headers,
            ..
        } => {
            assert_eq!(*status, 400);
            assert!(body.contains("params error"));
            assert_eq!(
                headers.get("x-bapi-limit-status").and_then(|v| v.to_str().ok()),
                Some("99")
            );
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(!err.is_retryable());
    assert_eq!(state.request_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 502 Bad Gateway\r\ncontent-length: 100\r\nconnection: close\r\n\r\npartial";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = client_for(format!("http://{addr}"), 5000);
    let err = client.get_symbols(Params::new()).await.unwrap_err();

    match &err {
        RestError::Server { status, body, .. } => {
            assert_eq!(*status, 502);
            assert!(body.is_empty());
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_non_json_success_body_is_string() {
    let state = Arc::new(TestServerState::default());
    let client = client_for(start_server(state).await, 5000);

    let payload = client.get_symbols(Params::new()).await.unwrap();
    assert_eq!(payload, Value::String("pong".to_string()));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let state = Arc::new(TestServerState::default());
    let client = client_for(start_server(state.clone()).await, 100);

    let err = client.get_positions(Params::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_retryable());
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(state.request_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{addr}"), 1000);
    let err = client.get_symbols(Params::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_unbuildable_request_is_client_error() {
    let transport = ReqwestTransport::new("bybit-rest-tests").unwrap();
    let request = HttpRequest {
        method: Method::Get,
        url: "not a url".to_string(),
        query: Vec::new(),
        timeout: Duration::from_millis(1000),
    };

    let err = transport.send(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Client);
    assert!(std::error::Error::source(&err).is_some());
}
