//! Login, registration, and logout form flows. These are the only handlers
//! that attach exchange-built cookie values to responses; failures re-render
//! the form with the outcome's user-safe message.

use crate::{
    auth::{
        cookies,
        types::RegisterFields,
    },
    session::store::Session,
    web::{
        found, see_other,
        templates::{render_page, LoginTemplate, RegisterFormValues, RegisterTemplate},
        AppState,
    },
};
use axum::{
    extract::Form,
    http::HeaderMap,
    response::Response,
    Extension,
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

const MISSING_FIELDS: &str = "All fields are required.";
const MISSING_CREDENTIALS: &str = "Email and password are required.";
const INVALID_EMAIL: &str = "Please enter a valid email address.";

/// Basic email format check on trimmed input.
fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub phone_number: String,
}

pub async fn login_form(Session(session): Session) -> Response {
    let snapshot = session.snapshot();
    if snapshot.identity.is_some() {
        return found("/home");
    }
    render_page(
        &snapshot,
        "Sign in",
        &LoginTemplate {
            error: None,
            email: String::new(),
        },
    )
}

pub async fn login_submit(
    Extension(state): Extension<AppState>,
    Session(session): Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim().to_string();

    let validation_error = if email.is_empty() || form.password.expose_secret().is_empty() {
        Some(MISSING_CREDENTIALS)
    } else if !valid_email(&email) {
        Some(INVALID_EMAIL)
    } else {
        None
    };
    if let Some(message) = validation_error {
        return render_login_error(&session.snapshot(), message.to_string(), email);
    }

    let outcome = state.exchange.authenticate(&email, &form.password).await;
    if outcome.success {
        session.set_identity(outcome.identity.clone());
        session.set_loading(false);

        let mut headers = HeaderMap::new();
        if let Some(cookies) = &outcome.cookies {
            cookies.apply(&mut headers);
        }
        see_other("/home", headers)
    } else {
        render_login_error(&session.snapshot(), outcome.message, email)
    }
}

pub async fn register_form(Session(session): Session) -> Response {
    let snapshot = session.snapshot();
    if snapshot.identity.is_some() {
        return found("/home");
    }
    render_page(
        &snapshot,
        "Create account",
        &RegisterTemplate {
            error: None,
            fields: RegisterFormValues::default(),
        },
    )
}

pub async fn register_submit(
    Extension(state): Extension<AppState>,
    Session(session): Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let fields = RegisterFields {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        phone_number: form.phone_number.trim().to_string(),
    };

    let validation_error = if fields.first_name.is_empty()
        || fields.last_name.is_empty()
        || fields.email.is_empty()
        || fields.password.expose_secret().is_empty()
        || fields.phone_number.is_empty()
    {
        Some(MISSING_FIELDS)
    } else if !valid_email(&fields.email) {
        Some(INVALID_EMAIL)
    } else {
        None
    };
    if let Some(message) = validation_error {
        return render_register_error(&session.snapshot(), message.to_string(), &fields);
    }

    let outcome = state.exchange.register(&fields).await;
    if outcome.success {
        session.set_identity(outcome.identity.clone());
        session.set_loading(false);

        let mut headers = HeaderMap::new();
        if let Some(cookies) = &outcome.cookies {
            cookies.apply(&mut headers);
        }
        see_other("/home", headers)
    } else {
        if let Some(detail) = &outcome.detail {
            // Diagnostic only; the rendered message stays user-safe.
            warn!("registration rejected: {detail}");
        }
        render_register_error(&session.snapshot(), outcome.message, &fields)
    }
}

/// End the session: best-effort backend revocation, unconditional local
/// clearing. Safe to call with no session at all.
pub async fn logout(
    Extension(state): Extension<AppState>,
    Session(session): Session,
    headers: HeaderMap,
) -> Response {
    let token = cookies::extract(&headers, cookies::TOKEN_COOKIE);
    let outcome = state.exchange.logout(token.as_deref()).await;

    // The store clears synchronously regardless of the backend outcome.
    session.clear();

    let mut response_headers = HeaderMap::new();
    if let Some(cookies) = &outcome.cookies {
        cookies.apply(&mut response_headers);
    }
    see_other("/home", response_headers)
}

fn render_login_error(
    snapshot: &crate::session::store::SessionState,
    message: String,
    email: String,
) -> Response {
    render_page(
        snapshot,
        "Sign in",
        &LoginTemplate {
            error: Some(message),
            email,
        },
    )
}

fn render_register_error(
    snapshot: &crate::session::store::SessionState,
    message: String,
    fields: &RegisterFields,
) -> Response {
    render_page(
        snapshot,
        "Create account",
        &RegisterTemplate {
            error: Some(message),
            fields: RegisterFormValues {
                first_name: fields.first_name.clone(),
                last_name: fields.last_name.clone(),
                email: fields.email.clone(),
                phone_number: fields.phone_number.clone(),
            },
        },
    )
}
