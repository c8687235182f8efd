//! Portal configuration.
//!
//! Loaded from a TOML file plus `RESPOND_`-prefixed environment overrides.

use std::path::Path;

use serde::Deserialize;

use crate::Result;

fn default_session_ttl() -> u64 {
  3600
}

fn default_unread_refresh() -> u64 {
  300
}

fn default_handoff_ttl() -> u64 {
  300
}

/// Process-wide settings for the session and handoff subsystems.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
  /// Symmetric secret for the HS256 token signatures.
  pub jwt_secret: String,

  /// Session store TTL and `expires_at` window, in seconds.
  #[serde(default = "default_session_ttl")]
  pub session_ttl_seconds: u64,

  /// Refresh window for the cached unread-message count, in seconds.
  /// Always shorter than the session TTL.
  #[serde(default = "default_unread_refresh")]
  pub unread_refresh_seconds: u64,

  /// Lifetime of a signed handoff token, in seconds.
  #[serde(default = "default_handoff_ttl")]
  pub handoff_ttl_seconds: u64,

  /// Downstream account-service URL embedded in handoff claims.
  pub account_service_url: String,

  /// UTC offset (whole hours) of the zone in which event timestamps are
  /// truncated to calendar dates for display and handoff claims.
  #[serde(default)]
  pub display_utc_offset_hours: i32,
}

impl PortalConfig {
  /// Read configuration from `path` (optional) and the environment.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.as_ref()).required(false))
      .add_source(config::Environment::with_prefix("RESPOND"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }
}
