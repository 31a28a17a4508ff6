//! HTTP transport
//!
//! Serializes request documents, performs one HTTP exchange per call and
//! parses the JSON response. Connection-level failures never escape as
//! errors: they come back as a synthetic `{"error": "..."}` document with
//! [`ResponseStatus::NoStatus`]. Engine error responses (any non-2xx status
//! with a JSON body) are passed through untouched.
//!
//! The underlying `reqwest` session is created lazily on first use and then
//! shared by every call, including concurrent ones. Only that one-time
//! creation is serialized.

use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::Error;

/// Status code recorded when no HTTP response was received
pub const NO_STATUS: u16 = 0;

/// HTTP verbs used against the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request document is sent with this verb
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Outcome code of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// The request never produced an HTTP response
    NoStatus,
    Http(u16),
}

impl ResponseStatus {
    fn from_code(code: u16) -> Self {
        if code == NO_STATUS {
            Self::NoStatus
        } else {
            Self::Http(code)
        }
    }

    /// Numeric code, [`NO_STATUS`] when no response was received
    pub fn code(self) -> u16 {
        match self {
            Self::NoStatus => NO_STATUS,
            Self::Http(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Http(code) if (200..300).contains(&code))
    }
}

/// Parsed response plus the recorded status
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: ResponseStatus,
    pub body: Value,
}

impl TransportResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::NoStatus,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `error` entry of the body, when it is a string
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl From<&ClientConfig> for TransportOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
        }
    }
}

/// JSON-over-HTTP transport with a lazily created, reused session
pub struct Transport {
    options: TransportOptions,
    session: OnceLock<Client>,
    init_lock: Mutex<()>,
    last_status: AtomicU16,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("options", &self.options)
            .field("connected", &self.is_connected())
            .field("last_status", &self.last_status())
            .finish()
    }
}

impl Transport {
    pub fn new(options: TransportOptions) -> Self {
        Self {
            options,
            session: OnceLock::new(),
            init_lock: Mutex::new(()),
            last_status: AtomicU16::new(NO_STATUS),
        }
    }

    /// A transport ready to be handed to several clients
    pub fn shared(options: TransportOptions) -> Arc<Self> {
        Arc::new(Self::new(options))
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Whether the session has been created
    pub fn is_connected(&self) -> bool {
        self.session.get().is_some()
    }

    /// Status of the most recent completed call on this transport
    pub fn last_status(&self) -> ResponseStatus {
        ResponseStatus::from_code(self.last_status.load(Ordering::Acquire))
    }

    fn session(&self) -> Result<&Client, reqwest::Error> {
        if let Some(client) = self.session.get() {
            return Ok(client);
        }

        let _guard = self.init_lock.lock();
        if let Some(client) = self.session.get() {
            return Ok(client);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;
        tracing::debug!("HTTP session created");
        Ok(self.session.get_or_init(|| client))
    }

    fn record(&self, status: ResponseStatus) {
        self.last_status.store(status.code(), Ordering::Release);
    }

    fn fail(&self, message: String) -> TransportResponse {
        tracing::warn!("Request failed: {}", message);
        self.record(ResponseStatus::NoStatus);
        TransportResponse::failure(message)
    }

    /// Perform one call. `body` is only sent for verbs that carry one.
    pub async fn send<B>(&self, method: Method, url: &str, body: Option<&B>) -> TransportResponse
    where
        B: Serialize + ?Sized,
    {
        let client = match self.session() {
            Ok(client) => client,
            Err(e) => return self.fail(format!("failed to create HTTP session: {}", e)),
        };

        let mut request = client
            .request(method.into(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(timeout) = self.options.timeout {
            request = request.timeout(timeout);
        }
        if method.carries_body() {
            if let Some(body) = body {
                match serde_json::to_vec(body) {
                    Ok(bytes) => {
                        tracing::debug!(
                            "{} {} body={}",
                            method,
                            url,
                            String::from_utf8_lossy(&bytes)
                        );
                        request = request.body(bytes);
                    }
                    Err(e) => return self.fail(format!("failed to serialize request: {}", e)),
                }
            } else {
                tracing::debug!("{} {}", method, url);
            }
        } else {
            tracing::debug!("{} {}", method, url);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return self.fail(e.to_string()),
        };

        let status = ResponseStatus::Http(response.status().as_u16());
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(format!("failed to read response body: {}", e)),
        };
        self.record(status);
        tracing::debug!("{} {} -> {}", method, url, status.code());

        let body = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            json!({ "error": format!("invalid JSON response: {}", e) })
        });
        TransportResponse { status, body }
    }

    pub async fn get(&self, url: &str) -> TransportResponse {
        self.send::<Value>(Method::Get, url, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, body: Option<&B>) -> TransportResponse {
        self.send(Method::Post, url, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, body: Option<&B>) -> TransportResponse {
        self.send(Method::Put, url, body).await
    }

    pub async fn delete(&self, url: &str) -> TransportResponse {
        self.send::<Value>(Method::Delete, url, None).await
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(TransportOptions::default())
    }
}
