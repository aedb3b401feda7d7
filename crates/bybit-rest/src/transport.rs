//! HTTP transport abstraction
//!
//! The client hands a fully signed [`HttpRequest`] to an [`HttpTransport`] and
//! gets back either the raw JSON payload or a classified [`RestError`]. The
//! trait lets tests swap the network for [`MockHttpTransport`].

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::error::{BoxError, RestError, RestResult};

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Upper-case verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signed request, ready to send
///
/// Parameters always travel in the query string, POST included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL without query
    pub url: String,
    /// Query parameters in wire order
    pub query: Vec<(String, String)>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpRequest {
    /// Look up one query parameter
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `METHOD url` for logs and error messages
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// Trait for HTTP transport abstraction
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request
    ///
    /// A 2xx response resolves with the body parsed as JSON (or as a JSON
    /// string when the body is not JSON). Anything else is classified into
    /// [`RestError::Server`], [`RestError::Network`] or [`RestError::Client`].
    async fn send(&self, request: HttpRequest) -> RestResult<Value>;
}

/// Parse a success body, falling back to a JSON string
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Real transport using reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given user agent
    pub fn new(user_agent: &str) -> RestResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| RestError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn classify(request: &HttpRequest, err: reqwest::Error) -> RestError {
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() || err.is_decode()
        {
            warn!(
                request = %request.describe(),
                timeout = err.is_timeout(),
                error = %err,
                "Request sent without response"
            );
            RestError::Network {
                message: request.describe(),
                source: Box::new(err),
            }
        } else {
            error!(error = %err, "Request could not be sent");
            RestError::Client {
                message: err.to_string(),
                source: Box::new(err),
            }
        }
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> RestResult<Value> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let result = builder
            .query(&request.query)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .timeout(request.timeout)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(Self::classify(&request, err)),
        };

        let status = response.status();
        if !status.is_success() {
            let source = response
                .error_for_status_ref()
                .err()
                .map(|e| Box::new(e) as BoxError);
            let headers = response.headers().clone();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Failed to read error response body");
                    String::new()
                }
            };

            error!(
                status = status.as_u16(),
                body = %body,
                headers = ?headers,
                "Server responded with failure status"
            );

            return Err(RestError::Server {
                status: status.as_u16(),
                body,
                headers,
                source,
            });
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return Err(Self::classify(&request, err)),
        };

        debug!(status = status.as_u16(), len = bytes.len(), "Response received");
        Ok(parse_body(&bytes))
    }
}

/// Mock transport for testing
///
/// Records every request, counts calls and replays queued responses. When the
/// queue is empty it answers with a minimal success envelope.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockHttpTransport {
    calls: std::sync::atomic::AtomicUsize,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
    responses: parking_lot::Mutex<std::collections::VecDeque<RestResult<Value>>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 2xx JSON payload
    pub fn push_json(&self, payload: Value) {
        self.responses.lock().push_back(Ok(payload));
    }

    /// Queue a non-2xx response
    pub fn push_server_error(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().push_back(Err(RestError::Server {
            status,
            body: body.into(),
            headers: reqwest::header::HeaderMap::new(),
            source: None,
        }));
    }

    /// Queue a request that gets no response
    pub fn push_network_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.responses.lock().push_back(Err(RestError::Network {
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                message.clone(),
            )),
            message,
        }));
    }

    /// Queue a request that cannot be sent
    pub fn push_client_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.responses.lock().push_back(Err(RestError::Client {
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                message.clone(),
            )),
            message,
        }));
    }

    /// Number of requests sent so far
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// All recorded requests
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> RestResult<Value> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Ok(serde_json::json!({"ret_code": 0, "ret_msg": "OK", "result": null}))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn request() -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: "https://api-testnet.bybit.com/user/leverage".to_string(),
            query: vec![
                ("api_key".to_string(), "key".to_string()),
                ("timestamp".to_string(), "1".to_string()),
            ],
            timeout: Duration::from_millis(5000),
        }
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(br#"{"ret_code":0}"#)["ret_code"], 0);
        assert_eq!(parse_body(b"OK"), Value::String("OK".to_string()));
        assert_eq!(parse_body(b""), Value::String(String::new()));
    }

    #[test]
    fn test_request_helpers() {
        let req = request();
        assert_eq!(req.query_param("timestamp"), Some("1"));
        assert_eq!(req.query_param("sign"), None);
        assert_eq!(
            req.describe(),
            "GET https://api-testnet.bybit.com/user/leverage"
        );
    }

    #[tokio::test]
    async fn test_mock_records_and_replays() {
        let mock = MockHttpTransport::new();
        mock.push_json(serde_json::json!({"ret_code": 0, "result": {"x": 1}}));
        mock.push_server_error(502, "bad gateway");
        mock.push_network_error("timed out");
        mock.push_client_error("bad url");

        assert_eq!(mock.send(request()).await.unwrap()["result"]["x"], 1);
        assert_eq!(mock.send(request()).await.unwrap_err().kind(), ErrorKind::Server);
        assert_eq!(mock.send(request()).await.unwrap_err().kind(), ErrorKind::Network);
        assert_eq!(mock.send(request()).await.unwrap_err().kind(), ErrorKind::Client);
        assert_eq!(mock.send(request()).await.unwrap()["ret_code"], 0);

        assert_eq!(mock.call_count(), 5);
        assert_eq!(mock.requests().len(), 5);
        assert_eq!(mock.last_request(), Some(request()));
    }
}
