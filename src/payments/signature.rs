use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("signature mismatch")]
    Mismatch,

    #[error("hash computation failed: {0}")]
    Hash(String),
}

/// Verifies a payment callback signature against the gateway's signing
/// contract. Trait seam so services can be tested with a mock verifier.
pub trait VerifySignature: Send + Sync {
    fn verify(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        supplied_signature: &str,
    ) -> Result<(), SignatureError>;
}

/// HMAC-SHA256 verifier keyed with the gateway key secret.
///
/// The gateway signs `"{order_id}|{payment_id}"` and sends the digest as
/// lowercase hex. Comparison is constant-time.
pub struct HmacSignatureVerifier {
    key_secret: String,
}

impl HmacSignatureVerifier {
    pub fn new(key_secret: impl Into<String>) -> Self {
        Self {
            key_secret: key_secret.into(),
        }
    }

    fn expected_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> Result<String, SignatureError> {
        let payload = format!("{}|{}", gateway_order_id, gateway_payment_id);
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| SignatureError::Hash(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl VerifySignature for HmacSignatureVerifier {
    fn verify(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        supplied_signature: &str,
    ) -> Result<(), SignatureError> {
        let expected = self.expected_signature(gateway_order_id, gateway_payment_id)?;
        if constant_time_eq(&expected, supplied_signature) {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut res = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        res |= x ^ y;
    }
    res == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // HMAC-SHA256("order_1|pay_1", "test_secret")
    const KNOWN_SIGNATURE: &str =
        "444ab3353f39d9a6cd042ce01e598f3a2819f46159b58f0ff40d4eed15d8e158";

    #[test]
    fn known_vector_verifies() {
        let verifier = HmacSignatureVerifier::new("test_secret");
        assert!(verifier.verify("order_1", "pay_1", KNOWN_SIGNATURE).is_ok());
    }

    #[test]
    fn expected_signature_is_lowercase_hex() {
        let verifier = HmacSignatureVerifier::new("test_secret");
        let expected = verifier.expected_signature("order_1", "pay_1").unwrap();
        assert_eq!(expected, KNOWN_SIGNATURE);
        assert_eq!(expected.len(), 64);
        assert!(expected
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn forged_signature_is_rejected() {
        let verifier = HmacSignatureVerifier::new("test_secret");
        let result = verifier.verify("order_1", "pay_1", "deadbeef");
        assert!(matches!(result, Err(SignatureError::Mismatch)));
    }

    #[test]
    fn uppercase_signature_is_rejected() {
        // The gateway contract is lowercase hex; case variants do not verify.
        let verifier = HmacSignatureVerifier::new("test_secret");
        let result = verifier.verify("order_1", "pay_1", &KNOWN_SIGNATURE.to_uppercase());
        assert!(matches!(result, Err(SignatureError::Mismatch)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = HmacSignatureVerifier::new("another_secret");
        let result = verifier.verify("order_1", "pay_1", KNOWN_SIGNATURE);
        assert!(matches!(result, Err(SignatureError::Mismatch)));
    }

    #[test]
    fn verification_is_idempotent() {
        let verifier = HmacSignatureVerifier::new("test_secret");
        assert!(verifier.verify("order_1", "pay_1", KNOWN_SIGNATURE).is_ok());
        assert!(verifier.verify("order_1", "pay_1", KNOWN_SIGNATURE).is_ok());
    }

    #[test]
    fn constant_time_eq_handles_length_mismatch() {
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("abcd", "abcd"));
        assert!(!constant_time_eq("abcd", "abce"));
    }
}
