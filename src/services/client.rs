use crate::services::errors::{ServiceError, ServiceErrorKind, error_value_message, upstream_message};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Connect timeout shared by every upstream connection (seconds).
pub(crate) const SERVICE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// One configured external endpoint. Built once from config at startup and
/// never mutated afterwards.
#[derive(Clone)]
pub struct ServiceEndpoint {
    /// Short name used in logs and error results ("detector", "summarizer", ...).
    pub name: String,
    pub url: String,
    /// Full value of the `Authorization` header.
    pub auth_header_value: String,
    /// Bound on the whole request, including reading the body.
    pub timeout: Duration,
}

impl ServiceEndpoint {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        auth_header_value: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            auth_header_value: auth_header_value.into(),
            timeout,
        }
    }

    /// Endpoint authenticated with `Authorization: Bearer <token>`.
    pub fn bearer(
        name: impl Into<String>,
        url: impl Into<String>,
        token: &str,
        timeout: Duration,
    ) -> Self {
        Self::new(name, url, format!("Bearer {}", token), timeout)
    }
}

impl fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("name", &self.name)
            .field("url", &self.url)
            .field(
                "auth_header_value",
                &if self.auth_header_value.is_empty() {
                    "[empty]"
                } else {
                    "[REDACTED]"
                },
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Retry-free JSON-over-HTTPS caller shared by every service wrapper.
///
/// Holds only a `reqwest::Client`, which is internally reference counted, so
/// cloning is cheap and clones share one connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    client: Client,
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(SERVICE_CONNECT_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// POST `payload` as JSON to `endpoint` and return the decoded body.
    ///
    /// The body's schema is opaque at this layer; wrappers inspect it.
    pub async fn call<P>(&self, endpoint: &ServiceEndpoint, payload: &P) -> Result<Value, ServiceError>
    where
        P: Serialize + ?Sized,
    {
        let started = Instant::now();
        let resp = self
            .client
            .post(&endpoint.url)
            .header(AUTHORIZATION, endpoint.auth_header_value.as_str())
            .timeout(endpoint.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(&endpoint.name, &e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                "{} service returned {} after {:?}",
                endpoint.name,
                status,
                started.elapsed()
            );
            return Err(ServiceError::new(
                ServiceErrorKind::Status(status.as_u16()),
                &endpoint.name,
                upstream_message(&body),
            ));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::from_reqwest(&endpoint.name, &e))?;
        let json: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ServiceError::new(
                ServiceErrorKind::Decode,
                &endpoint.name,
                format!("invalid JSON body: {}", e),
            )
        })?;

        // Hugging Face reports cold models and quota problems inside a 200 body
        if let Some(err) = json.as_object().and_then(|o| o.get("error")) {
            warn!("{} service returned an error body", endpoint.name);
            return Err(ServiceError::new(
                ServiceErrorKind::Status(status.as_u16()),
                &endpoint.name,
                error_value_message(err),
            ));
        }

        debug!(
            "{} service answered {} in {:?} ({} bytes)",
            endpoint.name,
            status,
            started.elapsed(),
            bytes.len()
        );
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint(server: &MockServer, timeout: Duration) -> ServiceEndpoint {
        ServiceEndpoint::bearer(
            "test",
            format!("{}/infer", server.uri()),
            "secret-token",
            timeout,
        )
    }

    #[tokio::test]
    async fn test_call_sends_auth_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/infer"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_json(json!({"inputs": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ok": true}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClient::new();
        let body = client
            .call(
                &endpoint(&server, Duration::from_secs(5)),
                &json!({"inputs": "hello"}),
            )
            .await
            .unwrap();
        assert_eq!(body, json!([{"ok": true}]));
    }

    #[tokio::test]
    async fn test_call_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "message": "Request had invalid authentication credentials."}
            })))
            .mount(&server)
            .await;

        let err = ServiceClient::new()
            .call(&endpoint(&server, Duration::from_secs(5)), &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::Status(401));
        assert_eq!(err.endpoint, "test");
        assert!(err.cause.contains("invalid authentication"), "{}", err);
    }

    #[tokio::test]
    async fn test_call_error_body_with_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": "Model is currently loading", "estimated_time": 12.5})),
            )
            .mount(&server)
            .await;

        let err = ServiceClient::new()
            .call(&endpoint(&server, Duration::from_secs(5)), &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::Status(200));
        assert_eq!(err.cause, "Model is currently loading");
    }

    #[tokio::test]
    async fn test_call_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = ServiceClient::new()
            .call(&endpoint(&server, Duration::from_secs(5)), &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_call_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = ServiceClient::new()
            .call(&endpoint(&server, Duration::from_millis(50)), &json!({}))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    }

    #[tokio::test]
    async fn test_call_connection_refused() {
        // Bind then drop so the port is closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/infer", listener.local_addr().unwrap());
        drop(listener);

        let ep = ServiceEndpoint::bearer("test", url, "t", Duration::from_secs(2));
        let err = ServiceClient::new().call(&ep, &json!({})).await.unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::Network);
    }

    #[test]
    fn test_endpoint_debug_redacts_credential() {
        let ep = ServiceEndpoint::bearer(
            "detector",
            "https://example.com",
            "hf_abc123",
            Duration::from_secs(1),
        );
        let dbg = format!("{:?}", ep);
        assert!(!dbg.contains("hf_abc123"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
