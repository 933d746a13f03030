//! The Session Provider: one hydration cycle per mount, gating everything
//! behind it.
//!
//! A mount is one browser request. The provider owns the store it creates,
//! issues exactly one identity fetch, and settles to a terminal phase; the
//! only way back to `Hydrating` is a new mount.

use crate::auth::client::ExchangeClient;
use crate::session::store::SessionHandle;
use tracing::debug;

/// Lifecycle of a provider mount. `Ready` and `Anonymous` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Hydrating,
    Ready,
    Anonymous,
}

#[derive(Debug, Default)]
pub struct SessionProvider {
    handle: SessionHandle,
    phase: Phase,
}

impl SessionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The store handle to expose to the subtree under this provider.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the hydration cycle. Exactly one identity fetch happens per mount;
    /// repeat calls are absorbed and settle immediately on the recorded
    /// phase without further network traffic.
    pub async fn hydrate(&mut self, exchange: &ExchangeClient, token: Option<&str>) -> Phase {
        if self.phase != Phase::Idle {
            return self.phase;
        }

        self.phase = Phase::Hydrating;
        let outcome = exchange.fetch_identity(token).await;

        if outcome.success && outcome.identity.is_some() {
            self.handle.set_identity(outcome.identity);
            self.handle.set_loading(false);
            self.phase = Phase::Ready;
        } else {
            debug!("session settled anonymous: {}", outcome.message);
            self.handle.clear();
            self.phase = Phase::Anonymous;
        }

        self.phase
    }
}
