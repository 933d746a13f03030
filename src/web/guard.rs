//! The Route Guard: a stateless per-request predicate over the role marker
//! cookie, evaluated before any page handler or session hydration runs.
//!
//! The check runs on every matching request, not once at login time; cookies
//! can be cleared or tampered with between requests. Absent, empty, or
//! malformed values all deny.

use crate::auth::{cookies, types::Role};
use crate::web::{found, AppState};
use axum::{extract::Request, middleware::Next, response::Response, Extension};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub protected_prefix: String,
    pub required_role: Role,
    pub fallback: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            required_role: Role::Admin,
            fallback: "/home".to_string(),
        }
    }
}

impl GuardConfig {
    /// Whether a request path falls under the protected prefix. Prefix
    /// matching is segment-aware: `/admin` and `/admin/orders` match,
    /// `/administrator` does not.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path == self.protected_prefix
            || path
                .strip_prefix(&self.protected_prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Fail closed: only the exact required role passes.
    #[must_use]
    pub fn allows(&self, role_marker: Option<&str>) -> bool {
        role_marker == Some(self.required_role.as_str())
    }
}

/// Middleware answering a redirect for unauthorized requests under the
/// protected prefix, passing everything else through unmodified.
pub async fn intercept(
    Extension(state): Extension<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !state.guard.matches(path) {
        return next.run(request).await;
    }

    let role_marker = cookies::extract(request.headers(), cookies::ROLE_COOKIE);
    if state.guard.allows(role_marker.as_deref()) {
        next.run(request).await
    } else {
        debug!(path, "role marker missing or insufficient, redirecting");
        found(&state.guard.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_segment_aware() {
        let guard = GuardConfig::default();
        assert!(guard.matches("/admin"));
        assert!(guard.matches("/admin/products"));
        assert!(guard.matches("/admin/products/42"));
        assert!(!guard.matches("/administrator"));
        assert!(!guard.matches("/home"));
        assert!(!guard.matches("/"));
    }

    #[test]
    fn test_allows_only_exact_role() {
        let guard = GuardConfig::default();
        assert!(guard.allows(Some("admin")));
        assert!(!guard.allows(Some("user")));
        assert!(!guard.allows(Some("Admin")));
        assert!(!guard.allows(Some("")));
        assert!(!guard.allows(Some("admin ")));
        assert!(!guard.allows(None));
    }
}
