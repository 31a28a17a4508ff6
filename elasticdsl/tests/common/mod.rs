//! Mock search engine for integration tests.
//!
//! Every request is recorded. Responses come from a per-path table, falling
//! back to `{"ok": true}` with status 200.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use elasticdsl::ClientConfig;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, String),
    /// Answer only after the delay
    Slow(Duration),
}

#[derive(Clone, Default)]
pub struct MockEngine {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockEngine {
    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies.lock().insert(path.to_string(), reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests.lock().last().cloned().unwrap()
    }
}

async fn handle(
    State(engine): State<MockEngine>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> axum::response::Response {
    let path = uri.path().to_string();
    engine.requests.lock().push(Recorded {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let reply = engine.replies.lock().get(&path).cloned();
    match reply {
        Some(Reply::Json(status, value)) => (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response(),
        Some(Reply::Text(status, text)) => {
            (StatusCode::from_u16(status).unwrap(), text).into_response()
        }
        Some(Reply::Slow(delay)) => {
            tokio::time::sleep(delay).await;
            axum::Json(json!({"ok": true})).into_response()
        }
        None => axum::Json(json!({"ok": true})).into_response(),
    }
}

/// Start the mock on a random port and return it with a config pointing at it.
pub async fn start_engine() -> (MockEngine, ClientConfig) {
    let engine = MockEngine::default();
    let router = Router::new().fallback(handle).with_state(engine.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (engine, ClientConfig::new("127.0.0.1", addr.port()))
}
