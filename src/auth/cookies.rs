//! Session cookie construction and parsing.
//!
//! Two cookies carry the session: `userToken` is the `HttpOnly` bearer token,
//! `userRole` is the plain role marker the route guard reads. Only the
//! credential flows build or clear them; everything else reads.

use crate::auth::types::Role;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

pub const TOKEN_COOKIE: &str = "userToken";
pub const ROLE_COOKIE: &str = "userRole";

/// `Set-Cookie` values produced by an exchange flow, ready to attach to a
/// response.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    values: Vec<HeaderValue>,
}

impl SessionCookies {
    /// Cookies for a fresh session: the bearer token, plus the role marker
    /// when the role is known. Without a role the marker is simply not
    /// written, so the guard keeps denying the protected prefix.
    ///
    /// # Errors
    /// Returns an error if the token contains bytes not valid in a header.
    pub fn for_session(
        token: &str,
        role: Option<Role>,
        secure: bool,
    ) -> Result<Self, InvalidHeaderValue> {
        let mut values = vec![token_cookie(token, secure)?];
        if let Some(role) = role {
            values.push(role_cookie(role, secure)?);
        }
        Ok(Self { values })
    }

    /// Clearing pair for logout: both cookies expired immediately.
    ///
    /// # Errors
    /// Returns an error if a cookie string fails header encoding.
    pub fn cleared(secure: bool) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            values: vec![
                expire_cookie(TOKEN_COOKIE, true, secure)?,
                expire_cookie(ROLE_COOKIE, false, secure)?,
            ],
        })
    }

    /// Append the `Set-Cookie` headers to a response header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for value in &self.values {
            headers.append(SET_COOKIE, value.clone());
        }
    }

    #[must_use]
    pub fn values(&self) -> &[HeaderValue] {
        &self.values
    }
}

/// Build the `HttpOnly` bearer token cookie.
fn token_cookie(token: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the role marker. Deliberately not `HttpOnly`: it carries no secret,
/// only the role string the guard compares against.
fn role_cookie(role: Role, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{ROLE_COOKIE}={role}; Path=/; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn expire_cookie(
    name: &str,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; SameSite=Lax; Max-Age=0");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read a cookie value from a request's `Cookie` header. Malformed pairs are
/// skipped, which downstream checks treat the same as absent.
#[must_use]
pub fn extract(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(val)) if key.trim() == name => return Some(val.trim().to_string()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_str(value: &HeaderValue) -> &str {
        value.to_str().expect("header value")
    }

    #[test]
    fn test_session_pair_shapes() {
        let cookies =
            SessionCookies::for_session("abc123", Some(Role::Admin), false).expect("cookies");
        let values = cookies.values();
        assert_eq!(values.len(), 2);

        let token = header_str(&values[0]);
        assert!(token.starts_with("userToken=abc123; "));
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("Path=/"));
        assert!(!token.contains("Secure"));

        let role = header_str(&values[1]);
        assert!(role.starts_with("userRole=admin; "));
        assert!(!role.contains("HttpOnly"));
    }

    #[test]
    fn test_unknown_role_writes_token_only() {
        let cookies = SessionCookies::for_session("abc123", None, false).expect("cookies");
        assert_eq!(cookies.values().len(), 1);
    }

    #[test]
    fn test_secure_flag() {
        let cookies =
            SessionCookies::for_session("abc123", Some(Role::User), true).expect("cookies");
        for value in cookies.values() {
            assert!(header_str(value).ends_with("; Secure"));
        }
    }

    #[test]
    fn test_cleared_expires_both() {
        let cookies = SessionCookies::cleared(false).expect("cookies");
        let values = cookies.values();
        assert_eq!(values.len(), 2);
        assert!(header_str(&values[0]).starts_with("userToken=;"));
        assert!(header_str(&values[0]).contains("Max-Age=0"));
        assert!(header_str(&values[1]).starts_with("userRole=;"));
        assert!(header_str(&values[1]).contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_from_multi_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; userToken=abc123; userRole=admin"),
        );

        assert_eq!(extract(&headers, TOKEN_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(extract(&headers, ROLE_COOKIE).as_deref(), Some("admin"));
        assert_eq!(extract(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_ignores_malformed_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("garbage; userRole=admin"));
        assert_eq!(extract(&headers, ROLE_COOKIE).as_deref(), Some("admin"));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("userRole=admin; garbage"));
        assert_eq!(extract(&headers, ROLE_COOKIE).as_deref(), Some("admin"));
    }

    #[test]
    fn test_extract_no_cookie_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract(&headers, TOKEN_COOKIE), None);
    }
}
