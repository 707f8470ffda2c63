//! Webhook signature verification.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Verify an `x-line-signature` header value against the raw request body.
///
/// The header carries a base64-encoded HMAC-SHA256 of the exact body bytes
/// under the channel secret. Comparison is constant-time. A missing or
/// empty secret fails verification rather than letting requests through.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature_header: &str) -> bool {
    if channel_secret.is_empty() {
        return false;
    }

    let Ok(expected) = BASE64.decode(signature_header.trim()) else {
        return false;
    };

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}

/// Compute the signature value for a body. Used by tests and webhook
/// tooling; the server side only ever verifies.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);

    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_round_trip() {
        let secret = "channel-secret";
        let body = br#"{"events":[]}"#;

        let signature = sign(secret, body);
        assert!(verify_signature(secret, body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let secret = "channel-secret";
        let signature = sign(secret, br#"{"events":[]}"#);

        // Well-formed base64, wrong body
        assert!(!verify_signature(secret, br#"{"events":[{}]}"#, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = br#"{"events":[]}"#;
        let signature = sign("channel-secret", body);

        assert!(!verify_signature("other-secret", body, &signature));
    }

    #[test]
    fn test_malformed_base64_rejected() {
        assert!(!verify_signature("channel-secret", b"{}", "not base64 !!!"));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let signature = sign("", b"{}");
        assert!(!verify_signature("", b"{}", &signature));
    }
}
