//! REST transport for the central-ledger admin API.
//!
//! Owns one lazily-built, pooled `reqwest` client per instance and
//! normalizes the ledger's heterogeneous HTTP/JSON failure shapes into the
//! [`ClientError`] taxonomy:
//!
//! - 2xx and 400 both pass the body through (400 carries structured
//!   business errors, not a transport failure); 404 is a connect-class
//!   error; anything else is an I/O-class error carrying status + body.
//! - An empty body behind a passing status is an I/O-class error, and a
//!   malformed JSON body is a parsing-class error embedding the raw text.
//! - Array bodies unwrap per the requested shape (single object vs array).
//! - Every decoded object is scanned for the `errorInformation` envelope
//!   before the caller ever sees a "successful" payload.

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::config::TlsSettings;
use crate::error::{ClientError, ErrorEnvelope};

const MAX_IDLE_PER_HOST: usize = 200;

pub struct RestTransport {
    base_url: String,
    tls: TlsSettings,
    client: Mutex<Option<Client>>,
    closed: AtomicBool,
}

impl RestTransport {
    pub fn new(base_url: &str, tls: TlsSettings) -> Self {
        let trimmed = base_url.trim();
        let base_url = if trimmed.is_empty() {
            "http://localhost:3001".to_string()
        } else {
            trimmed.trim_end_matches('/').to_string()
        };
        Self {
            base_url,
            tls,
            client: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET expecting a single JSON object.
    ///
    /// An array body unwraps to its first element; an empty array is a
    /// no-result error.
    pub async fn get_object(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.url_for(path);
        let raw = self.execute(Method::GET, path, &[], None).await?;
        let value = parse_json(&raw)?;
        let object = match value {
            Value::Array(mut items) => {
                if items.is_empty() {
                    return Err(ClientError::NoResult(format!(
                        "Empty result set from '{}'.",
                        url
                    )));
                }
                items.remove(0)
            }
            other => other,
        };
        if let Some(err) = ErrorEnvelope::declared_error(&object) {
            return Err(err);
        }
        Ok(object)
    }

    /// GET expecting a JSON array.
    pub async fn get_array(&self, path: &str) -> Result<Vec<Value>, ClientError> {
        let url = self.url_for(path);
        let raw = self.execute(Method::GET, path, &[], None).await?;
        match parse_json(&raw)? {
            Value::Array(items) => Ok(items),
            object => {
                if let Some(err) = ErrorEnvelope::declared_error(&object) {
                    return Err(err);
                }
                Err(ClientError::JsonParsing(format!(
                    "Expected a JSON array from '{}'.\n Response body is: \n\n{}",
                    url, raw
                )))
            }
        }
    }

    /// POST a JSON body, expecting a single JSON object back.
    pub async fn post_object(&self, path: &str, body: String) -> Result<Value, ClientError> {
        if body.trim().is_empty() {
            return Err(ClientError::FieldValidate("No JSON body to post.".to_string()));
        }
        let url = self.url_for(path);
        let raw = self.execute(Method::POST, path, &[], Some(body)).await?;
        let object = parse_json(&raw)?;
        if !object.is_object() {
            return Err(ClientError::JsonParsing(format!(
                "Expected a JSON object from '{}'.\n Response body is: \n\n{}",
                url, raw
            )));
        }
        if let Some(err) = ErrorEnvelope::declared_error(&object) {
            return Err(err);
        }
        Ok(object)
    }

    /// One request, one normalized raw body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<String, ClientError> {
        let client = self.client()?;
        let url = self.url_for(path);

        let mut request = client.request(method, &url);
        for (name, value) in headers {
            if name.trim().is_empty() || value.trim().is_empty() {
                continue;
            }
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_send_error(&url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::Connect(format!(
                "Endpoint for service not found. URL [{}].",
                url
            )));
        }

        if status.is_success() || status == StatusCode::BAD_REQUEST {
            let text = response
                .text()
                .await
                .map_err(|e| ClientError::Io(e.to_string()))?;
            if text.trim().is_empty() {
                return Err(ClientError::Io(format!("No response data from '{}'.", url)));
            }
            return Ok(text);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown");
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Io(format!(
            "Unexpected response status: {}. {}. \nResponse text [{}]",
            status.as_u16(),
            reason,
            text
        )))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the pooled client, building it on first use.
    fn client(&self) -> Result<Client, ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::IllegalState("Transport is closed.".to_string()));
        }
        let mut guard = self
            .client
            .lock()
            .map_err(|_| ClientError::IllegalState("Transport client lock poisoned.".to_string()))?;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let client = build_client(&self.tls)?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Releases the connection pool. Idempotent; the drop happens off the
    /// caller's thread so shutdown never blocks a worker.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let taken = match self.client.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(client) = taken {
            std::thread::spawn(move || drop(client));
        }
        debug!("Transport for {} closed.", self.base_url);
    }
}

fn build_client(tls: &TlsSettings) -> Result<Client, ClientError> {
    let mut builder = Client::builder().pool_max_idle_per_host(MAX_IDLE_PER_HOST);

    if let Some(path) = &tls.trust_store {
        if tls.trust_store_password.is_some() {
            debug!("PEM trust stores carry no password; ignoring configured trust_store_password.");
        }
        let pem = std::fs::read(path).map_err(|e| {
            ClientError::Cryptography(format!("Unable to read trust store '{}': {}", path, e))
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            ClientError::Cryptography(format!("Unable to load trust store '{}': {}", path, e))
        })?;
        builder = builder.tls_built_in_root_certs(false);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    if tls.insecure {
        warn!("TLS verification disabled: certificates and hostnames will not be checked.");
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    builder
        .build()
        .map_err(|e| ClientError::Cryptography(format!("Unable to initialise HTTP client: {}", e)))
}

fn map_send_error(url: &str, err: reqwest::Error) -> ClientError {
    if err.is_connect() {
        ClientError::Connect(format!("Unable to reach host '{}'. {}", url, err))
    } else {
        ClientError::Io(err.to_string())
    }
}

fn parse_json(raw: &str) -> Result<Value, ClientError> {
    serde_json::from_str(raw).map_err(|e| {
        ClientError::JsonParsing(format!("{}\n Response body is: \n\n{}", e, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode as AxStatus;
    use axum::routing::{get, post};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn transport(base: &str) -> RestTransport {
        RestTransport::new(base, TlsSettings::default())
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_connect_class() {
        let base = serve(Router::new()).await;
        let err = transport(&base).get_object("/nothing/here").await.unwrap_err();
        assert!(matches!(err, ClientError::Connect(_)), "got {:?}", err);
        assert_eq!(err.code(), 7);
    }

    #[tokio::test]
    async fn test_empty_success_body_is_io_class() {
        let router = Router::new().route("/empty", get(|| async { "" }));
        let base = serve(router).await;
        let err = transport(&base).get_object("/empty").await.unwrap_err();
        assert!(matches!(err, ClientError::Io(_)), "got {:?}", err);
        assert!(err.to_string().contains("No response data"));
    }

    #[tokio::test]
    async fn test_error_envelope_raises_server_declared() {
        let router = Router::new().route(
            "/enveloped",
            get(|| async {
                r#"{"errorInformation":{"errorCode":"2001","errorDescription":"Internal server error"}}"#
            }),
        );
        let base = serve(router).await;
        let err = transport(&base).get_object("/enveloped").await.unwrap_err();
        match err {
            ClientError::ServerDeclared { code, message } => {
                assert_eq!(code, 2001);
                assert_eq!(message, "Internal server error");
            }
            other => panic!("expected server-declared error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_array_body_unwraps_per_requested_shape() {
        let router = Router::new().route(
            "/list",
            get(|| async { r#"[{"name":"fspA"},{"name":"fspB"}]"# }),
        );
        let base = serve(router).await;
        let transport = transport(&base);

        let first = transport.get_object("/list").await.unwrap();
        assert_eq!(first["name"], "fspA");

        let all = transport.get_array("/list").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1]["name"], "fspB");
    }

    #[tokio::test]
    async fn test_bad_request_body_passes_through() {
        let router = Router::new().route(
            "/validate",
            post(|| async { (AxStatus::BAD_REQUEST, r#"{"reason":"missing field"}"#) }),
        );
        let base = serve(router).await;
        let body = transport(&base)
            .post_object("/validate", "{}".to_string())
            .await
            .unwrap();
        assert_eq!(body["reason"], "missing field");
    }

    #[tokio::test]
    async fn test_unexpected_status_is_io_class_with_body() {
        let router = Router::new().route(
            "/boom",
            get(|| async { (AxStatus::INTERNAL_SERVER_ERROR, "db on fire") }),
        );
        let base = serve(router).await;
        let err = transport(&base).get_object("/boom").await.unwrap_err();
        match err {
            ClientError::Io(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("db on fire"));
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_embeds_raw_body() {
        let router = Router::new().route("/html", get(|| async { "<html>sorry</html>" }));
        let base = serve(router).await;
        let err = transport(&base).get_object("/html").await.unwrap_err();
        match err {
            ClientError::JsonParsing(msg) => assert!(msg.contains("<html>sorry</html>")),
            other => panic!("expected parsing error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_class() {
        let err = transport("http://127.0.0.1:1")
            .get_object("/participants")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connect(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_empty_post_body_fails_before_any_network_call() {
        let err = transport("http://127.0.0.1:1")
            .post_object("/jmeter/transfers/prepare", "  ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::FieldValidate(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_rejects_reuse() {
        let router = Router::new().route("/ok", get(|| async { r#"{"ok":true}"# }));
        let base = serve(router).await;
        let transport = transport(&base);

        transport.get_object("/ok").await.unwrap();
        transport.close();
        transport.close();

        let err = transport.get_object("/ok").await.unwrap_err();
        assert!(matches!(err, ClientError::IllegalState(_)), "got {:?}", err);
    }
}
