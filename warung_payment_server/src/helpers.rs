//! Signature canonicalization for the signed-webhook provider.
//!
//! The provider signs each notification with HMAC-SHA256 over a canonical string assembled from the client id,
//! the request id and timestamp headers, the request target path, and a SHA-256 digest of the raw body. The field
//! order and the newline separators are fixed by the provider; get either wrong and nothing verifies.
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// The signature header carries its algorithm as a prefix, e.g. `Signature: HMACSHA256=<base64>`.
pub const SIGNATURE_PREFIX: &str = "HMACSHA256=";

/// Base64-encoded SHA-256 digest of the raw request body.
pub fn body_digest(body: &[u8]) -> String {
    base64::encode(Sha256::digest(body))
}

/// The canonical string the HMAC is computed over. Field order and separators are fixed by the provider.
pub fn signature_base(
    client_id: &str,
    request_id: &str,
    request_timestamp: &str,
    request_target: &str,
    digest: &str,
) -> String {
    format!(
        "Client-Id:{client_id}\nRequest-Id:{request_id}\nRequest-Timestamp:{request_timestamp}\nRequest-Target:\
         {request_target}\nDigest:{digest}"
    )
}

/// Compute the signature header value for a canonical string.
pub fn sign(secret: &str, signature_base: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(signature_base.as_bytes());
    format!("{SIGNATURE_PREFIX}{}", base64::encode(mac.finalize().into_bytes()))
}

/// Verify a header-supplied signature against the canonical string. The comparison itself happens inside
/// [`Mac::verify_slice`], which is constant-time.
pub fn verify_signature(secret: &str, signature_base: &str, header_value: &str) -> bool {
    let encoded = match header_value.strip_prefix(SIGNATURE_PREFIX) {
        Some(encoded) => encoded,
        None => return false,
    };
    let supplied = match base64::decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(signature_base.as_bytes());
    mac.verify_slice(&supplied).is_ok()
}
