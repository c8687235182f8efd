//! Error types for `respond-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The claims could not be serialised. Should not occur for the typed
  /// claim structs in this workspace.
  #[error("claims serialization error: {0}")]
  Encoding(#[source] serde_json::Error),

  /// The token is structurally damaged: wrong segment count, bad base64, or
  /// a payload that is not valid JSON.
  #[error("malformed token: {0}")]
  Malformed(String),

  /// The signature did not verify, or the token's header names an algorithm
  /// other than the configured one.
  #[error("token signature verification failed")]
  InvalidSignature,

  #[error("configuration error: {0}")]
  Config(#[from] ::config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
