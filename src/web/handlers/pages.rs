//! Page handlers: thin consumers of the session contract. They read the
//! store the provider mounted and render; authorization for the admin pages
//! already happened in the route guard.

use crate::{
    auth::types::Identity,
    session::store::{Session, SessionState},
    web::{
        found,
        templates::{
            render_page, AdminTemplate, HomeTemplate, NotFoundTemplate, ProfileTemplate,
            ProfileView,
        },
    },
};
use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::Response,
};

/// Dashboard sections of the admin shell. Anything else under `/admin` is a
/// 404 even for admins.
const ADMIN_SECTIONS: &[&str] = &[
    "products",
    "categories",
    "orders",
    "users",
    "shop-features",
    "sales",
    "sliders",
];

/// Status badge shown on the profile page: ordered (predicate, value) rules,
/// first match wins, with an explicit default.
const BADGE_RULES: &[(fn(&Identity) -> bool, &'static str)] = &[
    (Identity::is_admin, "Administrator"),
    (is_verified, "Verified member"),
];
const DEFAULT_BADGE: &str = "Unverified";

fn is_verified(identity: &Identity) -> bool {
    identity.email_verified_at.is_some()
}

fn status_badge(identity: &Identity) -> &'static str {
    BADGE_RULES
        .iter()
        .find(|(applies, _)| applies(identity))
        .map_or(DEFAULT_BADGE, |(_, badge)| *badge)
}

pub async fn root() -> Response {
    found("/home")
}

pub async fn home(Session(session): Session) -> Response {
    let snapshot = session.snapshot();
    let greeting = snapshot
        .identity
        .as_ref()
        .map(|identity| format!("Welcome back, {}.", identity.first_name));
    render_page(&snapshot, "Home", &HomeTemplate { greeting })
}

pub async fn profile(Session(session): Session) -> Response {
    let snapshot = session.snapshot();
    let profile = snapshot.identity.as_ref().map(profile_view);
    render_page(&snapshot, "Profile", &ProfileTemplate { profile })
}

pub async fn admin_dashboard(Session(session): Session) -> Response {
    render_page(
        &session.snapshot(),
        "Admin",
        &AdminTemplate {
            section: "dashboard".to_string(),
            sections: ADMIN_SECTIONS,
        },
    )
}

pub async fn admin_section(Session(session): Session, Path(section): Path<String>) -> Response {
    let snapshot = session.snapshot();
    if !ADMIN_SECTIONS.contains(&section.as_str()) {
        return not_found_page(&snapshot, &format!("/admin/{section}"));
    }
    render_page(
        &snapshot,
        "Admin",
        &AdminTemplate {
            section,
            sections: ADMIN_SECTIONS,
        },
    )
}

pub async fn not_found(Session(session): Session, uri: Uri) -> Response {
    not_found_page(&session.snapshot(), uri.path())
}

fn not_found_page(snapshot: &SessionState, path: &str) -> Response {
    let mut response = render_page(
        snapshot,
        "Not found",
        &NotFoundTemplate {
            path: path.to_string(),
        },
    );
    if response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NOT_FOUND;
    }
    response
}

fn profile_view(identity: &Identity) -> ProfileView {
    ProfileView {
        name: identity.display_name(),
        email: identity.email.clone(),
        phone_number: identity.phone_number.clone(),
        role: identity.role.to_string(),
        member_since: identity.created_at.format("%B %Y").to_string(),
        badge: status_badge(identity),
    }
}
