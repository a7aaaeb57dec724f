// Shared across the integration test binaries; not every binary uses every helper
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};

use console_client::error::TransportError;
use console_client::tenant::TenantStore;
use console_client::transport::{Method, RequestDescriptor, Transport};

/// Install a test subscriber once; keeps output tidy when RUST_LOG is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Scripted transport double: responses are keyed by "METHOD path", every
/// dispatched request is recorded, and an optional latency keeps requests
/// in flight long enough to exercise deduplication.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Result<Value, TransportError>>>,
    calls: Mutex<Vec<RequestDescriptor>>,
    latency: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn route_key(method: Method, path: &str) -> String {
        format!("{} {}", method.as_str(), path)
    }

    /// Script a successful response; re-registering a route replaces it
    pub fn on(&self, method: Method, path: &str, response: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(Self::route_key(method, path), Ok(response));
    }

    /// Script a failure response
    pub fn fail(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(Self::route_key(method, path), Err(TransportError::http(status, body)));
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method && req.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let routes = self.routes.lock().unwrap();
        routes
            .get(&Self::route_key(request.method, &request.path))
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::http(
                    404,
                    json!({"message": format!("no route for {} {}", request.method, request.path)}),
                ))
            })
    }
}

/// In-memory stand-in for browser storage
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl TenantStore for MemoryStore {
    fn set_item(&self, key: &str, value: Option<&str>) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.map(str::to_string));
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned().flatten()
    }
}

/// Poll a condition until it holds or the deadline passes
pub async fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
