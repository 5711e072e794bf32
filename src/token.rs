//! Stateless Signed Tokens
//!
//! Issues and validates bearer credentials without server-side session
//! state. Wire form: `base64url(payload-json) + "." + hex(hmac-sha256)`,
//! where the payload carries the caller's data and an absolute expiry in
//! epoch milliseconds. The MAC binds expiry to data so neither can be
//! altered independently; MAC comparison is constant-time.
//!
//! The signing secret is supplied out-of-band by process configuration.
//! Construction fails closed when it is absent - there is no fallback
//! secret anywhere in this module.

use crate::error::{GuardError, GuardResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Token payload: opaque caller data plus absolute expiry
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    data: serde_json::Value,
    exp: u64,
}

/// Why a token failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRejection {
    Malformed,
    Expired,
    BadSignature,
}

/// Verification outcome
#[derive(Debug, Clone)]
pub enum TokenVerification {
    Valid {
        data: serde_json::Value,
        expires_at_ms: u64,
    },
    Invalid(TokenRejection),
}

impl TokenVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerification::Valid { .. })
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            TokenVerification::Valid { data, .. } => Some(data),
            TokenVerification::Invalid(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<TokenRejection> {
        match self {
            TokenVerification::Valid { .. } => None,
            TokenVerification::Invalid(reason) => Some(*reason),
        }
    }
}

/// HMAC-SHA256 token codec over a process-lifetime secret
pub struct TokenCodec {
    secret: Zeroizing<Vec<u8>>,
}

impl TokenCodec {
    /// Fails closed on an empty secret rather than degrading to a default.
    pub fn new(secret: &[u8]) -> GuardResult<Self> {
        if secret.is_empty() {
            return Err(GuardError::config_error(
                "Token signing secret is not configured",
            ));
        }
        Ok(Self {
            secret: Zeroizing::new(secret.to_vec()),
        })
    }

    /// Issue a token carrying `data`, valid for `ttl` from now.
    pub fn issue(&self, data: serde_json::Value, ttl: Duration) -> GuardResult<String> {
        self.issue_at(data, ttl, now_epoch_ms())
    }

    fn issue_at(&self, data: serde_json::Value, ttl: Duration, now_ms: u64) -> GuardResult<String> {
        let payload = TokenPayload {
            data,
            exp: now_ms.saturating_add(ttl.as_millis() as u64),
        };
        let serialized = serde_json::to_vec(&payload)?;
        let mac = self.mac(&serialized);

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&serialized),
            hex::encode(mac)
        ))
    }

    /// Validate a token and return its data when authentic and unexpired.
    ///
    /// Total over untrusted input: any malformation comes back as a
    /// structured rejection, never an error.
    pub fn verify(&self, token: &str) -> TokenVerification {
        self.verify_at(token, now_epoch_ms())
    }

    fn verify_at(&self, token: &str, now_ms: u64) -> TokenVerification {
        // The payload segment is base64 and cannot itself contain a dot,
        // so splitting on the last one is unambiguous.
        let (payload_b64, mac_hex) = match token.rsplit_once('.') {
            Some(parts) => parts,
            None => return TokenVerification::Invalid(TokenRejection::Malformed),
        };
        if payload_b64.is_empty() || mac_hex.is_empty() {
            return TokenVerification::Invalid(TokenRejection::Malformed);
        }

        let payload_bytes = match URL_SAFE_NO_PAD.decode(payload_b64) {
            Ok(bytes) => bytes,
            Err(_) => return TokenVerification::Invalid(TokenRejection::Malformed),
        };
        let payload: TokenPayload = match serde_json::from_slice(&payload_bytes) {
            Ok(payload) => payload,
            Err(_) => return TokenVerification::Invalid(TokenRejection::Malformed),
        };

        if payload.exp < now_ms {
            return TokenVerification::Invalid(TokenRejection::Expired);
        }

        let provided_mac = match hex::decode(mac_hex) {
            Ok(bytes) => bytes,
            Err(_) => return TokenVerification::Invalid(TokenRejection::BadSignature),
        };
        let expected_mac = self.mac(&payload_bytes);

        if expected_mac.ct_eq(provided_mac.as_slice()).into() {
            TokenVerification::Valid {
                data: payload.data,
                expires_at_ms: payload.exp,
            }
        } else {
            TokenVerification::Invalid(TokenRejection::BadSignature)
        }
    }

    fn mac(&self, payload: &[u8]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().into()
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
