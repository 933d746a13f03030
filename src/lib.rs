//! # neoTech web tier
//!
//! Server-rendered storefront and admin shell for the neoTech e-shop, sitting
//! in front of the external neoTech REST backend.
//!
//! The session core is four pieces:
//!
//! - **Credential Exchange** ([`auth::client`]): talks to the backend to log
//!   in, register, fetch the current user, and log out. Every failure is
//!   normalized into a flat `{success, message}` outcome; no error type
//!   escapes into page code.
//! - **Session Store** ([`session::store`]): per-request holder of
//!   `{identity, loading}`, reachable only through the handle the provider
//!   injects. Using it without a mounted provider fails loudly.
//! - **Session Provider** ([`session::provider`]): one hydration cycle per
//!   request, settled before any handler runs.
//! - **Route Guard** ([`web::guard`]): redirects requests under the protected
//!   prefix unless the role marker cookie carries the required role.
//!
//! Identity lives behind two cookies: `userToken` (`HttpOnly` bearer token)
//! and `userRole` (plain role marker the guard reads). Only the credential
//! flows write them; the guard only reads.

pub mod auth;
pub mod cli;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
