//! Session Store and Session Provider: who the current user is, and whether
//! we are still finding out.

pub mod provider;
pub mod store;
