//! Identity claims — the signed contents of a respondent session.
//!
//! The claims are a typed record, converted to and from the token's generic
//! JSON map only at the [`TokenCodec`](crate::token::TokenCodec) boundary.
//! Expiry predicates take an explicit `now` so callers (and tests) evaluate
//! them against their own clock; the codec never enforces expiry itself.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated role carried in a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Respondent,
}

/// Cached unread secure-message count with its own refresh cadence,
/// independent of (and always shorter than) the outer session TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadMessageCount {
  pub value:      u32,
  /// Epoch seconds after which the cached value should be re-fetched from
  /// the secure-messaging service.
  pub refresh_in: i64,
}

/// The signed claim set for one respondent session.
///
/// Invariant: `expires_at > issued_at`. The store's TTL is an independent
/// operational safety net; this `expires_at` is the authorization-relevant
/// value checked by consumers of the decoded claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
  pub party_id:             Uuid,
  pub role:                 Role,
  /// Epoch seconds.
  pub issued_at:            i64,
  /// Epoch seconds.
  pub expires_at:           i64,
  pub unread_message_count: UnreadMessageCount,
}

impl IdentityClaims {
  /// Fresh claims for a newly authenticated respondent. The unread count
  /// starts at zero with the refresh window already running.
  pub fn new(
    party_id: Uuid,
    now: DateTime<Utc>,
    session_ttl_seconds: i64,
    unread_refresh_seconds: i64,
  ) -> Self {
    let now_ts = now.timestamp();
    Self {
      party_id,
      role: Role::Respondent,
      issued_at: now_ts,
      expires_at: now_ts + session_ttl_seconds,
      unread_message_count: UnreadMessageCount {
        value:      0,
        refresh_in: now_ts + unread_refresh_seconds,
      },
    }
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    now.timestamp() > self.expires_at
  }

  /// Whether the cached unread count has outlived its refresh window.
  pub fn unread_count_stale(&self, now: DateTime<Utc>) -> bool {
    now.timestamp() > self.unread_message_count.refresh_in
  }

  /// `expires_at` rendered as an RFC 3339 timestamp, for display.
  pub fn formatted_expires_at(&self) -> String {
    match Utc.timestamp_opt(self.expires_at, 0) {
      chrono::LocalResult::Single(dt) => dt.to_rfc3339(),
      _ => String::new(),
    }
  }
}
