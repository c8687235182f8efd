//! In-process [`SessionStore`] backend with real TTL semantics.
//!
//! Production deployments point the trait at a networked data grid; this
//! backend backs tests and local development. Deadlines are tracked on
//! [`tokio::time::Instant`], so TTL behaviour can be driven deterministically
//! from tests with `tokio::time::pause()`.

use std::{collections::HashMap, convert::Infallible, time::Duration};

use respond_core::store::SessionStore;
use tokio::{sync::RwLock, time::Instant};

struct Entry {
  value:      String,
  expires_at: Instant,
}

/// A session store backed by a guarded hash map.
///
/// Expired entries are treated as absent on read and dropped lazily on the
/// next write to the same key.
#[derive(Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SessionStore for MemoryStore {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    let entries = self.entries.read().await;
    let value = entries
      .get(key)
      .filter(|entry| entry.expires_at > Instant::now())
      .map(|entry| entry.value.clone());
    Ok(value)
  }

  async fn set_with_ttl(
    &self,
    key: &str,
    value: &str,
    ttl: Duration,
  ) -> Result<(), Infallible> {
    let entry = Entry {
      value:      value.to_owned(),
      expires_at: Instant::now() + ttl,
    };
    self.entries.write().await.insert(key.to_owned(), entry);
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), Infallible> {
    self.entries.write().await.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TTL: Duration = Duration::from_secs(3600);

  #[tokio::test]
  async fn get_missing_key_returns_none() {
    let store = MemoryStore::new();
    assert_eq!(store.get("nope").await.unwrap(), None);
  }

  #[tokio::test]
  async fn set_then_get_round_trips() {
    let store = MemoryStore::new();
    store.set_with_ttl("k", "v", TTL).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
  }

  #[tokio::test]
  async fn overwrite_replaces_value() {
    let store = MemoryStore::new();
    store.set_with_ttl("k", "first", TTL).await.unwrap();
    store.set_with_ttl("k", "second", TTL).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
  }

  #[tokio::test]
  async fn delete_is_idempotent() {
    let store = MemoryStore::new();
    store.set_with_ttl("k", "v", TTL).await.unwrap();
    store.delete("k").await.unwrap();
    store.delete("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn entry_expires_after_ttl() {
    let store = MemoryStore::new();
    store.set_with_ttl("k", "v", TTL).await.unwrap();

    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    assert!(store.get("k").await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(store.get("k").await.unwrap(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn overwrite_resets_the_expiry_clock() {
    let store = MemoryStore::new();
    store.set_with_ttl("k", "v", TTL).await.unwrap();

    tokio::time::advance(TTL - Duration::from_secs(10)).await;
    store.set_with_ttl("k", "v", TTL).await.unwrap();

    // Well past the original deadline, within the reset one.
    tokio::time::advance(TTL - Duration::from_secs(10)).await;
    assert!(store.get("k").await.unwrap().is_some());
  }
}
