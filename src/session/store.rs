//! The Session Store: single source of truth for `{identity, loading}`.
//!
//! Each store is owned by the provider that created it for one request; the
//! cloneable [`SessionHandle`] injected into request extensions is the only
//! access path. Requesting the [`Session`] extractor on a route the provider
//! middleware does not cover is a configuration error and answers 500.

use crate::auth::types::Identity;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::error;

/// Snapshot of the session: `loading` stays true from provider mount until
/// the hydration call resolves; `identity` is absent until one succeeds.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.identity
            .as_ref()
            .is_some_and(Identity::is_admin)
    }
}

/// Shared handle to one request's session store.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        self.lock().identity = identity;
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    /// Drop the identity and settle the store; the logout flow calls this
    /// synchronously, independent of the backend outcome.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.identity = None;
        state.loading = false;
    }
}

/// Extractor giving handlers the session handle the provider mounted.
pub struct Session(pub SessionHandle);

/// Rejection for session access without a mounted provider. Loud by design:
/// a silent default would mask a broken middleware stack.
pub struct NoProvider;

impl IntoResponse for NoProvider {
    fn into_response(self) -> Response {
        error!("session store accessed without a mounted session provider");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "session provider not mounted",
        )
            .into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = NoProvider;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .map(Session)
            .ok_or(NoProvider)
    }
}
