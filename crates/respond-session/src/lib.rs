//! Session lifecycle for the respondent portal.
//!
//! A session is a random, unguessable key in the session store mapping to a
//! signed identity token. [`SessionManager`] owns creation, persistence,
//! refresh, unread-count caching, and deletion, generic over any
//! [`respond_core::store::SessionStore`] backend.

pub mod error;
pub mod manager;

pub use error::{Error, Result};
pub use manager::{Session, SessionManager};

#[cfg(test)]
mod tests;
