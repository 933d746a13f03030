//! Askama templates: a layout that wraps a pre-rendered page body, plus the
//! per-page bodies. [`render_page`] carries the loading gate — a store that
//! is still loading yields the placeholder, never the page body, so no page
//! ever shows a transient logged-out state as final.

use crate::session::store::SessionState;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

/// Session-aware navigation data for the layout header.
pub struct Nav {
    pub signed_in: bool,
    pub display_name: String,
    pub is_admin: bool,
}

impl Nav {
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            signed_in: false,
            display_name: String::new(),
            is_admin: false,
        }
    }

    #[must_use]
    pub fn for_session(state: &SessionState) -> Self {
        state.identity.as_ref().map_or_else(Self::anonymous, |identity| Self {
            signed_in: true,
            display_name: identity.first_name.clone(),
            is_admin: identity.is_admin(),
        })
    }
}

#[derive(Template)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    pub title: String,
    pub nav: Nav,
    pub body: String,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub greeting: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

/// Sticky register form values so a failed submit does not wipe the form.
#[derive(Default)]
pub struct RegisterFormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub fields: RegisterFormValues,
}

pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub member_since: String,
    pub badge: &'static str,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub profile: Option<ProfileView>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub section: String,
    pub sections: &'static [&'static str],
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub path: String,
}

/// Render a page body inside the layout, honoring the loading gate.
pub fn render_page<T: Template>(session: &SessionState, title: &str, body: &T) -> Response {
    if session.loading {
        // Hydration unresolved: placeholder instead of children.
        return finish(title, Nav::anonymous(), &LoadingTemplate);
    }
    finish(title, Nav::for_session(session), body)
}

fn finish<T: Template>(title: &str, nav: Nav, body: &T) -> Response {
    let rendered = body.render().and_then(|body| {
        LayoutTemplate {
            title: title.to_string(),
            nav,
            body,
        }
        .render()
    });

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!("failed to render {title} page: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Identity, Role};
    use chrono::Utc;

    fn identity(role: Role) -> Identity {
        Identity {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Park".to_string(),
            email: "ada@example.com".to_string(),
            email_verified_at: None,
            role,
            phone_number: "+15550100".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_login_error_renders_in_red() {
        let html = LoginTemplate {
            error: Some("Invalid credentials".to_string()),
            email: "user@example.com".to_string(),
        }
        .render()
        .expect("render");

        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Invalid credentials"));
        assert!(html.contains("value=\"user@example.com\""));
    }

    #[test]
    fn test_login_without_error_has_no_error_block() {
        let html = LoginTemplate {
            error: None,
            email: String::new(),
        }
        .render()
        .expect("render");

        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_layout_shows_admin_link_only_for_admins() {
        let admin_state = SessionState {
            identity: Some(identity(Role::Admin)),
            loading: false,
        };
        let response_html = LayoutTemplate {
            title: "Home".to_string(),
            nav: Nav::for_session(&admin_state),
            body: String::new(),
        }
        .render()
        .expect("render");
        assert!(response_html.contains("href=\"/admin\""));

        let user_state = SessionState {
            identity: Some(identity(Role::User)),
            loading: false,
        };
        let response_html = LayoutTemplate {
            title: "Home".to_string(),
            nav: Nav::for_session(&user_state),
            body: String::new(),
        }
        .render()
        .expect("render");
        assert!(!response_html.contains("href=\"/admin\""));
    }

    #[tokio::test]
    async fn test_loading_gate_renders_placeholder() {
        use http_body_util::BodyExt;

        let loading_state = SessionState {
            identity: None,
            loading: true,
        };
        let response = render_page(
            &loading_state,
            "Home",
            &HomeTemplate {
                greeting: Some("should not appear".to_string()),
            },
        );
        assert_eq!(response.status(), StatusCode::OK);

        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let html = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(html.contains("Loading"));
        assert!(!html.contains("should not appear"));
    }
}
