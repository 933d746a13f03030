//! The Credential Exchange client: request/response translation against the
//! neoTech REST backend. Owns no state. Every public call resolves to an
//! [`Outcome`]; failures never propagate as errors.

use crate::auth::{
    cookies::SessionCookies,
    error::ExchangeError,
    types::{Envelope, ErrorBody, Identity, Outcome, RegisterFields, TokenGrant},
};
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

const SIGNED_IN: &str = "Signed in.";
const SIGNED_OUT: &str = "Signed out.";
const ACCOUNT_CREATED: &str = "Account created.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Clone)]
pub struct ExchangeClient {
    http: Client,
    base_url: Url,
    identity_timeout: Duration,
    secure_cookies: bool,
}

impl ExchangeClient {
    /// Build a client for the given backend base URL. `identity_timeout`
    /// bounds the current-user call only; other calls use transport defaults.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: Url, identity_timeout: Duration, secure_cookies: bool) -> Result<Self> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            identity_timeout,
            secure_cookies,
        })
    }

    /// Exchange credentials for a session. On success the outcome carries the
    /// `Set-Cookie` values for the token and role marker.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &SecretString) -> Outcome {
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        match self.token_grant("/login", &payload).await {
            Ok((message, grant)) => {
                self.session_outcome(grant, message.unwrap_or_else(|| SIGNED_IN.to_string()))
                    .await
            }
            Err(err) => {
                warn!("login failed: {err}");
                Outcome::failure(err.user_message())
            }
        }
    }

    /// Create an account; a successful registration signs the user in. The
    /// failure outcome carries a diagnostic `detail` alongside the user-safe
    /// message.
    #[instrument(skip(self, fields))]
    pub async fn register(&self, fields: &RegisterFields) -> Outcome {
        let payload = json!({
            "first_name": fields.first_name,
            "last_name": fields.last_name,
            "email": fields.email,
            "password": fields.password.expose_secret(),
            "phone_number": fields.phone_number,
        });

        match self.token_grant("/register", &payload).await {
            Ok((message, grant)) => {
                self.session_outcome(grant, message.unwrap_or_else(|| ACCOUNT_CREATED.to_string()))
                    .await
            }
            Err(err) => {
                warn!("registration failed: {err}");
                Outcome::failure(err.user_message()).with_detail(err.to_string())
            }
        }
    }

    /// Resolve a stored token into an identity. With no token this fails fast
    /// without touching the network; with one, the current-user call is
    /// bounded by the configured timeout and any failure settles as an
    /// ordinary anonymous outcome.
    #[instrument(skip(self, token))]
    pub async fn fetch_identity(&self, token: Option<&str>) -> Outcome {
        let Some(token) = token else {
            return Outcome::failure(ExchangeError::TokenMissing.user_message());
        };

        match self.current_user(token).await {
            Ok(identity) => Outcome::ok(SIGNED_IN).with_identity(Some(identity)),
            Err(err) => {
                debug!("identity fetch failed: {err}");
                Outcome::failure(err.user_message())
            }
        }
    }

    /// End the session. Always locally successful: the clearing cookies are
    /// produced unconditionally and the backend invalidation call is
    /// best-effort.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: Option<&str>) -> Outcome {
        if let Some(token) = token {
            if let Err(err) = self.revoke(token).await {
                warn!("backend logout failed, clearing local session anyway: {err}");
            }
        }

        match SessionCookies::cleared(self.secure_cookies) {
            Ok(cookies) => Outcome::ok(SIGNED_OUT).with_cookies(cookies),
            Err(err) => {
                error!("failed to build clearing cookies: {err}");
                Outcome::ok(SIGNED_OUT)
            }
        }
    }

    async fn token_grant(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<(Option<String>, TokenGrant), ExchangeError> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(payload).send().await?;
        let envelope = parse_envelope::<TokenGrant>(response).await?;
        let grant = envelope
            .data
            .ok_or_else(|| ExchangeError::Unknown("missing token payload".to_string()))?;
        Ok((envelope.message, grant))
    }

    /// Turn a token grant into a success outcome with cookies attached. When
    /// the backend omits the embedded user, the role is learned through a
    /// follow-up current-user call; if even that fails, the role marker is
    /// not produced and the guard keeps denying.
    async fn session_outcome(&self, grant: TokenGrant, message: String) -> Outcome {
        let identity = match grant.user {
            Some(user) => Some(user),
            None => self.fetch_identity(Some(&grant.token)).await.identity,
        };
        let role = identity.as_ref().map(|identity| identity.role);

        match SessionCookies::for_session(&grant.token, role, self.secure_cookies) {
            Ok(cookies) => Outcome::ok(message)
                .with_identity(identity)
                .with_cookies(cookies),
            Err(err) => {
                error!("failed to build session cookies: {err}");
                Outcome::failure(GENERIC_FAILURE)
            }
        }
    }

    async fn current_user(&self, token: &str) -> Result<Identity, ExchangeError> {
        let url = self.endpoint("/user")?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .timeout(self.identity_timeout)
            .send()
            .await?;
        let envelope = parse_envelope::<Identity>(response).await?;
        envelope
            .data
            .ok_or_else(|| ExchangeError::Unknown("missing identity payload".to_string()))
    }

    async fn revoke(&self, token: &str) -> Result<(), ExchangeError> {
        let url = self.endpoint("/logout")?;
        let response = self.http.post(url).bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_status(
                status,
                response.json::<ErrorBody>().await.ok(),
            ))
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ExchangeError> {
        self.base_url
            .join(path)
            .map_err(|err| ExchangeError::Unknown(format!("invalid endpoint {path}: {err}")))
    }
}

async fn parse_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<Envelope<T>, ExchangeError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<Envelope<T>>()
            .await
            .map_err(ExchangeError::from)
    } else {
        Err(error_from_status(
            status,
            response.json::<ErrorBody>().await.ok(),
        ))
    }
}

fn error_from_status(status: StatusCode, body: Option<ErrorBody>) -> ExchangeError {
    let message = body.as_ref().and_then(|body| body.message.clone());

    if status.is_server_error() {
        return ExchangeError::Server(message.unwrap_or_else(|| status.to_string()));
    }

    if body.as_ref().is_some_and(|body| body.errors.is_some())
        || status == StatusCode::UNPROCESSABLE_ENTITY
    {
        let message = message
            .or_else(|| first_field_error(body.as_ref()))
            .unwrap_or_else(|| "Please review the submitted fields.".to_string());
        return ExchangeError::Validation(message);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ExchangeError::Unauthorized(
            message.unwrap_or_else(|| "Invalid email or password.".to_string()),
        );
    }

    ExchangeError::Unknown(message.unwrap_or_else(|| status.to_string()))
}

fn first_field_error(body: Option<&ErrorBody>) -> Option<String> {
    body?
        .errors
        .as_ref()?
        .values()
        .flat_map(|messages| messages.iter())
        .next()
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str, timeout_ms: u64) -> ExchangeClient {
        ExchangeClient::new(
            Url::parse(base).expect("base url"),
            Duration::from_millis(timeout_ms),
            false,
        )
        .expect("client")
    }

    #[tokio::test]
    async fn test_fetch_identity_without_token_fails_fast() {
        // Unroutable base: a network attempt would surface a different message.
        let client = client("http://127.0.0.1:9/", 200);

        let outcome = client.fetch_identity(None).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "token not found");
        assert!(outcome.identity.is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_without_session() {
        let client = client("http://127.0.0.1:9/", 200);

        let first = client.logout(None).await;
        let second = client.logout(None).await;
        assert!(first.success);
        assert!(second.success);
        assert!(first.cookies.is_some());
        assert!(second.cookies.is_some());
    }

    #[test]
    fn test_error_from_status_unauthorized() {
        let body = ErrorBody {
            message: Some("Invalid credentials".to_string()),
            errors: None,
        };
        let err = error_from_status(StatusCode::UNAUTHORIZED, Some(body));
        assert!(matches!(err, ExchangeError::Unauthorized(_)));
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_error_from_status_unauthorized_without_body() {
        let err = error_from_status(StatusCode::UNAUTHORIZED, None);
        assert_eq!(err.user_message(), "Invalid email or password.");
    }

    #[test]
    fn test_error_from_status_validation_picks_field_error() {
        let mut errors = std::collections::BTreeMap::new();
        errors.insert(
            "email".to_string(),
            vec!["The email has already been taken.".to_string()],
        );
        let body = ErrorBody {
            message: None,
            errors: Some(errors),
        };
        let err = error_from_status(StatusCode::UNPROCESSABLE_ENTITY, Some(body));
        assert!(matches!(err, ExchangeError::Validation(_)));
        assert_eq!(err.user_message(), "The email has already been taken.");
    }

    #[test]
    fn test_error_from_status_server_fault() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, None);
        assert!(matches!(err, ExchangeError::Server(_)));
    }

    #[test]
    fn test_endpoint_join() {
        let client = client("http://localhost:8000", 200);
        let url = client.endpoint("/login").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8000/login");
    }
}
