//! Integration tests for [`SessionManager`] against the in-memory store.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use respond_core::{
  claims::{IdentityClaims, Role},
  token::TokenCodec,
};
use respond_store_memory::MemoryStore;
use uuid::Uuid;

use crate::{Error, Session, SessionManager};

const SECRET: &[u8] = b"session-test-secret";
const SESSION_TTL: Duration = Duration::from_secs(3600);
const UNREAD_REFRESH: Duration = Duration::from_secs(300);

fn manager() -> (SessionManager<MemoryStore>, Arc<MemoryStore>) {
  let store = Arc::new(MemoryStore::new());
  let manager = SessionManager::new(
    store.clone(),
    TokenCodec::new(SECRET),
    SESSION_TTL,
    UNREAD_REFRESH,
  );
  (manager, store)
}

async fn saved_session(
  manager: &SessionManager<MemoryStore>,
  party_id: Uuid,
) -> Session {
  let session = manager.create(party_id).unwrap();
  manager.save(&session).await.unwrap();
  session
}

// ─── Create / save / load ────────────────────────────────────────────────────

#[tokio::test]
async fn created_session_is_retrievable_after_save() {
  let (manager, _) = manager();
  let party_id = Uuid::new_v4();
  let session = saved_session(&manager, party_id).await;

  let loaded = manager.load(session.session_key()).await.unwrap();
  let claims = manager.claims(&loaded).unwrap();

  assert_eq!(claims.party_id, party_id);
  assert_eq!(claims.role, Role::Respondent);
  assert_eq!(claims.unread_message_count.value, 0);
  assert!(claims.expires_at > claims.issued_at);
}

#[tokio::test]
async fn session_key_is_not_derived_from_the_party_id() {
  let (manager, _) = manager();
  let party_id = Uuid::new_v4();

  let a = manager.create(party_id).unwrap();
  let b = manager.create(party_id).unwrap();

  assert_ne!(a.session_key(), b.session_key());
  assert_ne!(a.session_key(), party_id.to_string());
}

#[tokio::test]
async fn unsaved_session_is_not_in_the_store() {
  let (manager, _) = manager();
  let session = manager.create(Uuid::new_v4()).unwrap();

  let loaded = manager.load(session.session_key()).await.unwrap();
  assert!(matches!(manager.claims(&loaded), Err(Error::NoSession)));
}

#[tokio::test]
async fn load_unknown_key_yields_no_session() {
  let (manager, _) = manager();
  let loaded = manager.load("unknown-key").await.unwrap();

  assert!(loaded.encoded_token().is_none());
  assert!(matches!(manager.claims(&loaded), Err(Error::NoSession)));
}

#[tokio::test]
async fn tampered_store_value_is_not_trusted() {
  let (manager, store) = manager();
  let session = saved_session(&manager, Uuid::new_v4()).await;

  // Corrupt the stored token out-of-band.
  use respond_core::store::SessionStore;
  let token = store.get(session.session_key()).await.unwrap().unwrap();
  let corrupted = format!("{token}x");
  store
    .set_with_ttl(session.session_key(), &corrupted, SESSION_TTL)
    .await
    .unwrap();

  let loaded = manager.load(session.session_key()).await.unwrap();
  assert!(matches!(
    manager.claims(&loaded),
    Err(Error::Token(respond_core::Error::InvalidSignature))
      | Err(Error::Token(respond_core::Error::Malformed(_)))
  ));
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_extends_expiry_and_preserves_unread_count() {
  let (manager, store) = manager();
  let codec = TokenCodec::new(SECRET);

  // Plant a session whose expiry window has nearly lapsed.
  let party_id = Uuid::new_v4();
  let mut stale = IdentityClaims::new(party_id, Utc::now(), 3600, 300);
  stale.expires_at = Utc::now().timestamp() + 10;
  stale.unread_message_count.value = 7;

  use respond_core::store::SessionStore;
  store
    .set_with_ttl("stale-key", &codec.encode(&stale).unwrap(), SESSION_TTL)
    .await
    .unwrap();

  let mut session = manager.load("stale-key").await.unwrap();
  manager.refresh(&mut session).await.unwrap();

  let refreshed = manager.claims(&session).unwrap();
  assert!(refreshed.expires_at > stale.expires_at);
  assert_eq!(refreshed.unread_message_count.value, 7);
  assert_eq!(refreshed.party_id, party_id);

  // The refreshed token is what the store now holds.
  let persisted = manager.load("stale-key").await.unwrap();
  assert_eq!(
    manager.claims(&persisted).unwrap().expires_at,
    refreshed.expires_at
  );
}

#[tokio::test(start_paused = true)]
async fn save_resets_the_store_ttl() {
  let (manager, _) = manager();
  let session = saved_session(&manager, Uuid::new_v4()).await;

  tokio::time::advance(SESSION_TTL - Duration::from_secs(10)).await;
  manager.save(&session).await.unwrap();

  // Past the original deadline; the re-save keeps the session alive.
  tokio::time::advance(SESSION_TTL - Duration::from_secs(10)).await;
  let loaded = manager.load(session.session_key()).await.unwrap();
  assert!(loaded.encoded_token().is_some());

  tokio::time::advance(Duration::from_secs(20)).await;
  let loaded = manager.load(session.session_key()).await.unwrap();
  assert!(loaded.encoded_token().is_none());
}

// ─── Unread count ────────────────────────────────────────────────────────────

#[tokio::test]
async fn unread_count_round_trips_through_the_store() {
  let (manager, _) = manager();
  let mut session = saved_session(&manager, Uuid::new_v4()).await;

  manager.set_unread_count(&mut session, 5).await.unwrap();

  let loaded = manager.load(session.session_key()).await.unwrap();
  assert_eq!(manager.unread_count(&loaded).unwrap(), 5);
  assert!(!manager.is_unread_count_stale(&loaded).unwrap());
}

#[tokio::test]
async fn unread_count_goes_stale_after_the_refresh_window() {
  let (manager, _) = manager();
  let session = saved_session(&manager, Uuid::new_v4()).await;
  let claims = manager.claims(&session).unwrap();

  let now = Utc::now();
  assert!(!claims.unread_count_stale(now));
  assert!(claims.unread_count_stale(now + chrono::Duration::seconds(301)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_load_yields_no_session() {
  let (manager, _) = manager();
  let session = saved_session(&manager, Uuid::new_v4()).await;

  manager.delete(&session).await.unwrap();

  let loaded = manager.load(session.session_key()).await.unwrap();
  assert!(matches!(manager.claims(&loaded), Err(Error::NoSession)));
}

#[tokio::test]
async fn delete_is_idempotent() {
  let (manager, _) = manager();
  let session = saved_session(&manager, Uuid::new_v4()).await;

  manager.delete(&session).await.unwrap();
  manager.delete(&session).await.unwrap();
}
