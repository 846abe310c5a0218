//! Stateless encode/decode/sign/verify of the compact signed-token format.
//!
//! Wire format: `base64url(header).base64url(payload).base64url(signature)`,
//! no padding. The header is always `{"alg":"HS256","typ":"JWT"}`; the
//! signature is HMAC-SHA256 over `header.payload` with the deployment secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::secret::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Signs and verifies tokens. Stateless apart from the secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: SigningSecret,
}

impl TokenCodec {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Serialize and sign `claims` into a three-segment token.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let payload = serde_json::to_vec(claims).map_err(|e| AuthError::Signing(e.to_string()))?;

        let header_b64 = URL_SAFE_NO_PAD.encode(HEADER_JSON.as_bytes());
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signing_input = format!("{header_b64}.{payload_b64}");

        let signature = self.compute_mac(signing_input.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Check structure and signature, then decode the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let (signing_input, payload_b64, signature_b64) = split_segments(token)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::BadSignature)?;

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        decode_payload(payload_b64)
    }

    /// Structural checks only — never use the result to authorize access.
    ///
    /// Exists so callers can extract a jti for denylist bookkeeping without a
    /// second signature pass.
    pub fn parse_unverified(&self, token: &str) -> Result<Claims, AuthError> {
        let (_, payload_b64, _) = split_segments(token)?;
        decode_payload(payload_b64)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn compute_mac(&self, input: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Split into exactly three segments; also returns the signing input
/// (`header.payload`) as one slice of the original string.
fn split_segments(token: &str) -> Result<(&str, &str, &str), AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken);
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    let signing_input_len = header.len() + 1 + payload.len();
    Ok((&token[..signing_input_len], payload, signature))
}

fn decode_payload(payload_b64: &str) -> Result<Claims, AuthError> {
    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AuthError::MalformedPayload)?;
    serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    use base64::Engine as _;
    use chrono::Utc;
    use proptest::prelude::*;

    use sentra_core::{Role, Subject};

    fn codec() -> TokenCodec {
        TokenCodec::new(SigningSecret::new("unit-test-signing-secret-0123456789"))
    }

    fn claims() -> Claims {
        let subject = Subject::new(1, "u-1", "a@b.com", "Alice").unwrap();
        Claims::issue(&subject, Role::new("user"), Utc::now(), 86_400)
    }

    #[test]
    fn sign_verify_roundtrip() {
        let codec = codec();
        let claims = claims();
        let token = codec.sign(&claims).unwrap();
        let decoded = codec.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn header_segment_is_fixed() {
        let token = codec().sign(&claims()).unwrap();
        let header_b64 = token.split('.').next().unwrap();
        let header = URL_SAFE_NO_PAD.decode(header_b64).unwrap();
        assert_eq!(header, HEADER_JSON.as_bytes());
    }

    #[test]
    fn token_has_no_padding() {
        let token = codec().sign(&claims()).unwrap();
        assert!(!token.contains('='));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let codec = codec();
        for bad in ["", "one", "one.two", "one.two.three.four", "..", "a..c"] {
            assert_eq!(codec.verify(bad).unwrap_err(), AuthError::MalformedToken, "{bad:?}");
        }
    }

    #[test]
    fn tampered_signature_is_bad_signature_never_malformed() {
        let codec = codec();
        let token = codec.sign(&claims()).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        // Flip every byte of the signature segment in turn; each must fail as
        // a signature mismatch, not a structural error.
        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert_eq!(
                codec.verify(&tampered).unwrap_err(),
                AuthError::BadSignature,
                "flipped byte {i}"
            );
        }
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let codec = codec();
        let token = codec.sign(&claims()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();

        let other = codec.sign(&claims()).unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;

        let spliced = parts.join(".");
        assert_eq!(codec.verify(&spliced).unwrap_err(), AuthError::BadSignature);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = codec().sign(&claims()).unwrap();
        let other = TokenCodec::new(SigningSecret::new("a-different-secret-0123456789abcdef"));
        assert_eq!(other.verify(&token).unwrap_err(), AuthError::BadSignature);
    }

    #[test]
    fn parse_unverified_skips_signature() {
        let codec = codec();
        let claims = claims();
        let token = codec.sign(&claims).unwrap();

        // Corrupt the signature; parse_unverified must still extract claims.
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "AAAA";
        let corrupted = parts.join(".");

        assert_eq!(codec.verify(&corrupted).unwrap_err(), AuthError::BadSignature);
        assert_eq!(codec.parse_unverified(&corrupted).unwrap().jti, claims.jti);
    }

    #[test]
    fn parse_unverified_still_checks_structure() {
        let codec = codec();
        assert_eq!(
            codec.parse_unverified("a.b").unwrap_err(),
            AuthError::MalformedToken
        );
        assert_eq!(
            codec.parse_unverified("a.!!!.c").unwrap_err(),
            AuthError::MalformedPayload
        );
    }

    proptest! {
        #[test]
        fn roundtrip_for_arbitrary_claims(
            user_id in any::<i64>(),
            user_uuid in "[a-z0-9-]{1,40}",
            email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
            display_name in ".{0,40}",
            role in "[a-z]{1,16}",
            iat in 0i64..4_000_000_000,
            ttl in 1i64..100_000_000,
        ) {
            let codec = codec();
            let claims = Claims {
                jti: uuid::Uuid::now_v7().to_string(),
                user_id,
                user_uuid,
                email,
                display_name,
                role: Role::from(role),
                iat,
                exp: iat + ttl,
            };
            let token = codec.sign(&claims).unwrap();
            prop_assert_eq!(codec.verify(&token).unwrap(), claims);
        }
    }
}
