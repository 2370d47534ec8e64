use crate::models::TokenPayload;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

// JWTs use the URL-safe alphabet; some issuers emit the standard one
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Outcome of the local, unverified token check
#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    Valid,
    Expired,
    Malformed(String),
}

/// Decodes the claims segment of a three-segment token without checking
/// the signature. Only the backend can say whether a token is genuine.
pub fn decode_payload(token: &str) -> Result<TokenPayload, String> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(format!("expected 3 segments, found {}", segments.len()));
    }

    let encoded = segments[1];
    let bytes = URL_SAFE_LENIENT
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
        .map_err(|e| format!("payload is not base64: {}", e))?;

    serde_json::from_slice(&bytes).map_err(|e| format!("payload is not a JSON object: {}", e))
}

/// Checks a token against the wall clock given in milliseconds since epoch.
/// A token without an `exp` claim never expires.
pub fn token_status(token: &str, now_millis: i64) -> TokenStatus {
    let payload = match decode_payload(token) {
        Ok(payload) => payload,
        Err(reason) => return TokenStatus::Malformed(reason),
    };

    match payload.exp {
        Some(exp) => {
            let expired = exp * 1000.0 <= now_millis as f64;
            tracing::debug!(
                "Token expiration check: now_ms={}, exp={}, expired={}",
                now_millis,
                exp,
                expired
            );
            if expired {
                TokenStatus::Expired
            } else {
                TokenStatus::Valid
            }
        }
        None => {
            tracing::debug!("Token has no expiration time, assuming not expired");
            TokenStatus::Valid
        }
    }
}
