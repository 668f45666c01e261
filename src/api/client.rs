use super::request::ApiRequest;
use super::response::extract_data;
use super::transport::Transport;
use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

pub const REFRESH_PATH: &str = "/auth/refresh-token";
pub const LOGIN_ROUTE: &str = "/login";

/// Side effect fired when a refresh fails and the user has to sign in again.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, _target: &str) {}
}

type RefreshOutcome = Result<()>;

/// At most one refresh is in flight; everyone else waits in `Refreshing`.
enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// HTTP client that recovers from an expired access credential by refreshing
/// it once and retrying.
pub struct ApiClient<T> {
    transport: T,
    navigator: Arc<dyn Navigator>,
    refresh: Mutex<RefreshState>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            navigator: Arc::new(NoopNavigator),
            refresh: Mutex::new(RefreshState::Idle),
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.state(), RefreshState::Refreshing(_))
    }

    /// Send a request, refreshing the credential and retrying once on 401.
    pub async fn request(&self, request: &ApiRequest) -> Result<Value> {
        match self.transport.send(request).await {
            Err(err) if err.is_auth_failure() && request.recover_auth => {
                tracing::debug!(path = %request.path, "access credential rejected");
            }
            other => return other,
        }

        self.recover().await?;

        // Second attempt: a repeated 401 is returned as-is.
        self.transport.send(request).await
    }

    /// Send a request and unwrap the response envelope into `R`.
    pub async fn call<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R> {
        extract_data(self.request(request).await?)
    }

    async fn recover(&self) -> RefreshOutcome {
        let waiter = {
            let mut state = self.state();
            match &mut *state {
                RefreshState::Refreshing(pending) => {
                    let (tx, rx) = oneshot::channel();
                    pending.push(tx);
                    tracing::debug!(queued = pending.len(), "waiting on in-flight refresh");
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            return rx.await.unwrap_or(Err(ApiError::RefreshAbandoned));
        }

        let guard = RefreshGuard {
            state: &self.refresh,
            settled: false,
        };

        tracing::debug!("refreshing access credential");
        let refresh = ApiRequest::post(REFRESH_PATH).without_auth_recovery();
        let outcome = self.transport.send(&refresh).await.map(|_| ());

        let released = guard.settle(&outcome);
        match &outcome {
            Ok(()) => tracing::info!(released, "access credential refreshed"),
            Err(err) => {
                tracing::warn!(released, error = %err, "credential refresh failed");
                self.navigator.redirect(LOGIN_ROUTE);
            }
        }

        outcome
    }

    fn state(&self) -> MutexGuard<'_, RefreshState> {
        lock(&self.refresh)
    }
}

fn lock(state: &Mutex<RefreshState>) -> MutexGuard<'_, RefreshState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take_pending(state: &Mutex<RefreshState>) -> Vec<oneshot::Sender<RefreshOutcome>> {
    match std::mem::replace(&mut *lock(state), RefreshState::Idle) {
        RefreshState::Refreshing(pending) => pending,
        RefreshState::Idle => Vec::new(),
    }
}

/// Returns the state to `Idle` even if the refreshing task is dropped
/// mid-flight; queued waiters then see `RefreshAbandoned`.
struct RefreshGuard<'a> {
    state: &'a Mutex<RefreshState>,
    settled: bool,
}

impl RefreshGuard<'_> {
    fn settle(mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        let pending = take_pending(self.state);
        let released = pending.len();
        for waiter in pending {
            let _ = waiter.send(outcome.clone());
        }
        released
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            drop(take_pending(self.state));
        }
    }
}
