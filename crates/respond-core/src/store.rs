//! The `SessionStore` trait.
//!
//! A minimal key-value interface backing session persistence. The production
//! deployment points this at a networked in-memory data grid; tests and
//! local development use `respond-store-memory`. TTL expiry is enforced by
//! the store, not by callers — the store is the sole owner of session
//! durability.
//!
//! All methods return `Send` futures so the trait can be used from
//! multi-threaded async runtimes.

use std::{future::Future, time::Duration};

/// Abstraction over the session key-value store.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the value stored under `key`. Returns `None` when the key is
  /// absent or its TTL has lapsed — the two are indistinguishable.
  fn get(
    &self,
    key: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Write `value` under `key`, overwriting any prior value and resetting
  /// the expiry clock to `ttl` from now.
  fn set_with_ttl(
    &self,
    key: &str,
    value: &str,
    ttl: Duration,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Remove `key`. Deleting an absent key is not an error.
  fn delete(
    &self,
    key: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
