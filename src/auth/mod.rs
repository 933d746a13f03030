//! Credential Exchange: the only component that talks to the backend about
//! identity, and the only writer of the session cookies.

pub mod client;
pub mod cookies;
pub mod error;
pub mod types;
