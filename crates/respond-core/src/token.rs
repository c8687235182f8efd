//! [`TokenCodec`] — signed-token encode/decode.
//!
//! Tokens use the compact JWS form (`header.payload.signature`) with a fixed
//! HS256 header and URL-safe unpadded base64 segments. The codec signs and
//! verifies; it never enforces expiry — `exp`/`expires_at` are claims data,
//! and each caller applies its own expiry policy to the decoded claims.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
  alg: String,
  typ: String,
}

// ─── Codec ───────────────────────────────────────────────────────────────────

/// Stateless signer/verifier around a process-wide symmetric secret.
///
/// Cloning is cheap; the codec is safe to share across request tasks.
#[derive(Clone)]
pub struct TokenCodec {
  secret: Vec<u8>,
}

impl TokenCodec {
  pub fn new(secret: impl Into<Vec<u8>>) -> Self {
    Self { secret: secret.into() }
  }

  /// Serialise and sign `claims` into a compact three-segment token.
  pub fn encode<C: Serialize>(&self, claims: &C) -> Result<String> {
    let header = Header {
      alg: ALGORITHM.to_owned(),
      typ: "JWT".to_owned(),
    };
    let header_b64 =
      B64.encode(serde_json::to_vec(&header).map_err(Error::Encoding)?);
    let payload_b64 =
      B64.encode(serde_json::to_vec(claims).map_err(Error::Encoding)?);

    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = self.sign(signing_input.as_bytes());

    Ok(format!("{signing_input}.{}", B64.encode(signature)))
  }

  /// Verify the signature of `token` and deserialise its payload.
  ///
  /// Fails with [`Error::Malformed`] on structural damage and
  /// [`Error::InvalidSignature`] on a verification miss or a header whose
  /// `alg` differs from `HS256`. Never silently downgraded — a token that
  /// does not verify must not be trusted.
  pub fn decode<C: DeserializeOwned>(&self, token: &str) -> Result<C> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
      segments.next(),
      segments.next(),
      segments.next(),
      segments.next(),
    ) else {
      return Err(Error::Malformed("expected three segments".to_owned()));
    };

    let header_bytes = B64
      .decode(header_b64)
      .map_err(|_| Error::Malformed("header is not valid base64".to_owned()))?;
    let header: Header = serde_json::from_slice(&header_bytes)
      .map_err(|_| Error::Malformed("header is not valid JSON".to_owned()))?;

    // Reject algorithm substitution before touching the signature.
    if header.alg != ALGORITHM {
      return Err(Error::InvalidSignature);
    }

    let signature = B64.decode(signature_b64).map_err(|_| {
      Error::Malformed("signature is not valid base64".to_owned())
    })?;

    let signing_input = format!("{header_b64}.{payload_b64}");
    let mut mac = self.mac();
    mac.update(signing_input.as_bytes());
    // Constant-time comparison.
    mac
      .verify_slice(&signature)
      .map_err(|_| Error::InvalidSignature)?;

    let payload_bytes = B64.decode(payload_b64).map_err(|_| {
      Error::Malformed("payload is not valid base64".to_owned())
    })?;
    serde_json::from_slice(&payload_bytes)
      .map_err(|e| Error::Malformed(format!("payload is not valid JSON: {e}")))
  }

  fn sign(&self, input: &[u8]) -> Vec<u8> {
    let mut mac = self.mac();
    mac.update(input);
    mac.finalize().into_bytes().to_vec()
  }

  fn mac(&self) -> HmacSha256 {
    // HMAC-SHA256 accepts keys of any length.
    HmacSha256::new_from_slice(&self.secret)
      .expect("HMAC accepts any key length")
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
