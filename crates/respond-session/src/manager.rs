//! [`Session`] and [`SessionManager`].

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use respond_core::{
  claims::{IdentityClaims, UnreadMessageCount},
  config::PortalConfig,
  store::SessionStore,
  token::TokenCodec,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Session ─────────────────────────────────────────────────────────────────

/// One respondent session: an opaque store key plus the encoded identity
/// token, if the key resolved to one.
///
/// The session key is random and never derived from the respondent's
/// identity. The store holds the only durable copy of the token; a
/// `Session` is a per-request handle, not a cache.
#[derive(Debug, Clone)]
pub struct Session {
  session_key: String,
  token:       Option<String>,
}

impl Session {
  pub fn session_key(&self) -> &str {
    &self.session_key
  }

  /// The encoded token, or `None` when the store key was absent.
  pub fn encoded_token(&self) -> Option<&str> {
    self.token.as_deref()
  }
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Owns the session lifecycle against an injected store and codec.
///
/// Every operation is safe to call concurrently from independent request
/// tasks; the manager holds no mutable state of its own. Within a single
/// session the store's read-modify-write pattern is not transactional:
/// concurrent refreshes race and the last `save` wins. Accepted — sessions
/// are per browser tab and collisions are rare and low-stakes.
pub struct SessionManager<S> {
  store:          Arc<S>,
  codec:          TokenCodec,
  session_ttl:    Duration,
  unread_refresh: Duration,
}

impl<S: SessionStore> SessionManager<S> {
  pub fn new(
    store: Arc<S>,
    codec: TokenCodec,
    session_ttl: Duration,
    unread_refresh: Duration,
  ) -> Self {
    Self { store, codec, session_ttl, unread_refresh }
  }

  pub fn from_config(store: Arc<S>, config: &PortalConfig) -> Self {
    Self::new(
      store,
      TokenCodec::new(config.jwt_secret.as_bytes()),
      Duration::from_secs(config.session_ttl_seconds),
      Duration::from_secs(config.unread_refresh_seconds),
    )
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Build a new, unpersisted session for `party_id` with a fresh random
  /// session key. Call [`save`](Self::save) to persist it.
  pub fn create(&self, party_id: Uuid) -> Result<Session> {
    let claims = IdentityClaims::new(
      party_id,
      Utc::now(),
      self.session_ttl.as_secs() as i64,
      self.unread_refresh.as_secs() as i64,
    );
    let token = self.codec.encode(&claims)?;
    Ok(Session {
      session_key: Uuid::new_v4().to_string(),
      token:       Some(token),
    })
  }

  /// Write the session's token to the store, resetting the store TTL to the
  /// full session lifetime. Idempotent.
  ///
  /// The store TTL and the claims' `expires_at` are independent expiry
  /// notions: the TTL is an operational safety net, `expires_at` is the
  /// authorization-relevant value.
  pub async fn save(&self, session: &Session) -> Result<()> {
    let token = session.token.as_deref().ok_or(Error::NoSession)?;
    self
      .store
      .set_with_ttl(&session.session_key, token, self.session_ttl)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    tracing::debug!(session_key = %session.session_key, "session saved");
    Ok(())
  }

  /// Look up `session_key` in the store. An absent key yields a session
  /// whose [`claims`](Self::claims) fail with [`Error::NoSession`].
  pub async fn load(&self, session_key: &str) -> Result<Session> {
    let token = self
      .store
      .get(session_key)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    Ok(Session { session_key: session_key.to_owned(), token })
  }

  /// Remove the session from the store. Logout path; idempotent.
  pub async fn delete(&self, session: &Session) -> Result<()> {
    self
      .store
      .delete(&session.session_key)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    tracing::debug!(session_key = %session.session_key, "session deleted");
    Ok(())
  }

  // ── Claims ────────────────────────────────────────────────────────────────

  /// Decode the session's identity claims.
  ///
  /// Fails with [`Error::NoSession`] when the store key was absent, and
  /// surfaces codec failures unchanged — a token that does not verify must
  /// not be trusted.
  pub fn claims(&self, session: &Session) -> Result<IdentityClaims> {
    let token = session.token.as_deref().ok_or(Error::NoSession)?;
    Ok(self.codec.decode(token)?)
  }

  /// Extend the session: recompute `expires_at` from now, re-encode, and
  /// re-save (which also resets the store TTL). Leaves the unread count and
  /// its refresh window untouched.
  pub async fn refresh(&self, session: &mut Session) -> Result<()> {
    let mut claims = self.claims(session)?;
    claims.expires_at =
      Utc::now().timestamp() + self.session_ttl.as_secs() as i64;
    session.token = Some(self.codec.encode(&claims)?);
    self.save(session).await
  }

  /// Record a freshly fetched unread-message count and restart its refresh
  /// window.
  pub async fn set_unread_count(
    &self,
    session: &mut Session,
    count: u32,
  ) -> Result<()> {
    let mut claims = self.claims(session)?;
    claims.unread_message_count = UnreadMessageCount {
      value:      count,
      refresh_in: Utc::now().timestamp()
        + self.unread_refresh.as_secs() as i64,
    };
    session.token = Some(self.codec.encode(&claims)?);
    self.save(session).await
  }

  pub fn unread_count(&self, session: &Session) -> Result<u32> {
    Ok(self.claims(session)?.unread_message_count.value)
  }

  /// Whether the cached unread count should be re-fetched from the
  /// secure-messaging service.
  pub fn is_unread_count_stale(&self, session: &Session) -> Result<bool> {
    Ok(self.claims(session)?.unread_count_stale(Utc::now()))
  }
}
