//! Sign and verify the session cookie value.
//!
//! Wire format: `base64url(JSON payload) + "." + base64url(HMAC-SHA256 tag)`,
//! both segments unpadded. The tag is computed over the encoded payload
//! segment, so verification never touches untrusted bytes before the MAC
//! check passes.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Payload carried in the signed session cookie.
///
/// Serialization is canonical: a struct with fixed field order, so the same
/// payload always signs to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionPayload {
    pub user_id: i32,
    /// Epoch milliseconds at session creation.
    pub issued_at: i64,
}

fn mac_for(secret: &str, data: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    mac
}

/// Sign a payload with the process secret.
pub fn sign(payload: &SessionPayload, secret: &str) -> String {
    let json = serde_json::to_vec(payload).expect("session payload serializes");
    let data = URL_SAFE_NO_PAD.encode(json);
    let tag = mac_for(secret, &data).finalize().into_bytes();
    format!("{data}.{}", URL_SAFE_NO_PAD.encode(tag))
}

/// Verify a cookie value and recover the payload.
///
/// Fail-closed: any malformed, truncated, or tampered input — wrong segment
/// count, bad base64, MAC mismatch, unparseable JSON, non-integer fields —
/// yields `None`. Never panics, never returns an error. The MAC comparison is
/// constant-time over the full tag (`Mac::verify_slice`), so a mismatch leaks
/// nothing about how close the forgery was.
pub fn verify(value: &str, secret: &str) -> Option<SessionPayload> {
    let (data, tag) = value.split_once('.')?;
    if tag.contains('.') {
        return None;
    }
    let tag = URL_SAFE_NO_PAD.decode(tag).ok()?;
    mac_for(secret, data).verify_slice(&tag).ok()?;
    let json = URL_SAFE_NO_PAD.decode(data).ok()?;
    serde_json::from_slice(&json).ok()
}
