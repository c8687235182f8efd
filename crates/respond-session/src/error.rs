//! Error type for `respond-session`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The store key is absent or expired — indistinguishable from a session
  /// that never existed. Callers treat the user as unauthenticated.
  #[error("no session")]
  NoSession,

  /// Token codec failure. A tampered or corrupted session token is fatal to
  /// the request and never silently repaired.
  #[error("token error: {0}")]
  Token(#[from] respond_core::Error),

  #[error("session store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
