use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Header Paystack puts the body signature in.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Hex-encoded HMAC-SHA512 of `payload`.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = hmac_for(secret);
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `signature` against the raw request body in constant time.
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };

    let mut mac = hmac_for(secret);
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

fn hmac_for(secret: &str) -> HmacSha512 {
    // HMAC accepts keys of any length, so this cannot fail.
    match HmacSha512::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA512 accepts keys of any length"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk_test_secret";
    const BODY: &[u8] = br#"{"event":"charge.success","data":{"reference":"tg1-abc"}}"#;

    #[test]
    fn test_valid_signature() {
        let signature = sign(SECRET, BODY);
        assert_eq!(signature.len(), 128);
        assert!(verify(SECRET, BODY, &signature));
        assert!(verify(SECRET, BODY, &signature.to_uppercase()));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signature = sign("another_secret", BODY);
        assert!(!verify(SECRET, BODY, &signature));
    }

    #[test]
    fn test_modified_payload_is_rejected() {
        let signature = sign(SECRET, BODY);
        let tampered = br#"{"event":"charge.success","data":{"reference":"tg2-abc"}}"#;
        assert!(!verify(SECRET, tampered, &signature));
    }

    #[test]
    fn test_garbage_signature_is_rejected() {
        assert!(!verify(SECRET, BODY, ""));
        assert!(!verify(SECRET, BODY, "not-hex"));
        assert!(!verify(SECRET, BODY, "abcd"));
    }
}
