use crate::error::Result;
use crate::models::{Role, Session};
use async_trait::async_trait;
use tokio::sync::{OnceCell, RwLock};

/// Where the current identity comes from (`GET /user/get-me` in production).
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn fetch_session(&self) -> Result<Session>;
}

#[async_trait]
impl<S: IdentitySource + ?Sized> IdentitySource for std::sync::Arc<S> {
    async fn fetch_session(&self) -> Result<Session> {
        (**self).fetch_session().await
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    loading: bool,
    /// Bumped by every `load`; only the newest load may settle the state.
    generation: u64,
}

/// What a consumer is allowed to branch on.
///
/// While a load is running the previous identity may be mid-transition, so it
/// is reported as `Loading` rather than handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionView {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionView::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.session().map_or(false, |s| allowed.contains(&s.role))
    }
}

/// Cached identity of the current user.
///
/// Owned by the composition root and passed by reference. `load` is the only
/// way the stored identity changes.
pub struct SessionStore<S> {
    source: S,
    state: RwLock<SessionState>,
}

impl<S: IdentitySource> SessionStore<S> {
    /// Create the store and run the initial load.
    pub async fn mount(source: S) -> Self {
        let store = Self {
            source,
            state: RwLock::new(SessionState {
                session: None,
                loading: true,
                generation: 0,
            }),
        };
        store.load().await;
        store
    }

    /// Re-fetch the current identity. Any failure leaves the store anonymous.
    ///
    /// When loads overlap, the result of the most recently started one wins
    /// and the store stays loading until that one finishes.
    pub async fn load(&self) {
        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let fetched = self.source.fetch_session().await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "discarding stale session load"
            );
            return;
        }
        state.session = match fetched {
            Ok(session) => {
                tracing::debug!(user_id = %session.user_id, role = %session.role, "session loaded");
                Some(session)
            }
            Err(err) => {
                tracing::debug!(error = %err, "no active session");
                None
            }
        };
        state.loading = false;
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.read().await;
        if state.loading {
            return SessionView::Loading;
        }
        match &state.session {
            Some(session) => SessionView::Authenticated(session.clone()),
            None => SessionView::Anonymous,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Bring a lazily mounted store up to date: the first call mounts it (one
/// fetch), later calls reload the existing store.
pub async fn mount_or_reload<S, F>(
    cell: &OnceCell<SessionStore<S>>,
    source: F,
) -> &SessionStore<S>
where
    S: IdentitySource,
    F: FnOnce() -> S,
{
    if let Some(store) = cell.get() {
        store.load().await;
        return store;
    }
    cell.get_or_init(|| SessionStore::mount(source())).await
}
