#![allow(dead_code)]

use async_trait::async_trait;
use eventmates::api::{ApiRequest, Navigator, Transport, REFRESH_PATH};
use eventmates::error::{ApiError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// In-memory backend: every non-refresh request is rejected with 401 until a
/// refresh succeeds.
pub struct ScriptedTransport {
    refresh_result: Result<()>,
    /// Hold refresh calls until `release_refresh` is called.
    hold_refresh: bool,
    release: Notify,
    refreshed: AtomicBool,
    /// Keep answering 401 even after a refresh.
    always_unauthorized: bool,
    /// Fixed failures for specific paths.
    failures: HashMap<String, ApiError>,
    responses: HashMap<String, Value>,
    pub refresh_calls: AtomicUsize,
    pub unauthorized_responses: AtomicUsize,
    pub sent: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            refresh_result: Ok(()),
            hold_refresh: false,
            release: Notify::new(),
            refreshed: AtomicBool::new(false),
            always_unauthorized: false,
            failures: HashMap::new(),
            responses: HashMap::new(),
            refresh_calls: AtomicUsize::new(0),
            unauthorized_responses: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn authenticated(self) -> Self {
        self.refreshed.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_refresh(mut self, err: ApiError) -> Self {
        self.refresh_result = Err(err);
        self
    }

    pub fn holding_refresh(mut self) -> Self {
        self.hold_refresh = true;
        self
    }

    pub fn always_unauthorized(mut self) -> Self {
        self.always_unauthorized = true;
        self
    }

    pub fn failing(mut self, path: &str, err: ApiError) -> Self {
        self.failures.insert(path.to_string(), err);
        self
    }

    pub fn responding(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub fn release_refresh(&self) {
        self.release.notify_one();
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn unauthorized_count(&self) -> usize {
        self.unauthorized_responses.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn sent_to(&self, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.sent.lock().unwrap().push(request.path.clone());
        self.requests.lock().unwrap().push(request.clone());

        if request.path == REFRESH_PATH {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.hold_refresh {
                self.release.notified().await;
            }
            return match &self.refresh_result {
                Ok(()) => {
                    self.refreshed.store(true, Ordering::SeqCst);
                    Ok(json!({ "success": true, "message": "Token refreshed" }))
                }
                Err(err) => Err(err.clone()),
            };
        }

        if let Some(err) = self.failures.get(&request.path) {
            return Err(err.clone());
        }

        if self.always_unauthorized || !self.refreshed.load(Ordering::SeqCst) {
            self.unauthorized_responses.fetch_add(1, Ordering::SeqCst);
            return Err(ApiError::http(401, "jwt expired"));
        }

        Ok(self.responses.get(&request.path).cloned().unwrap_or_else(|| {
            json!({ "success": true, "message": "ok", "data": request.path })
        }))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub targets: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        self.targets.lock().unwrap().push(target.to_string());
    }
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}
