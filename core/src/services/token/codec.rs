//! Compact signed-claims codec (`header.claims.signature`, JWT layout)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainResult, TokenError};

use super::signer::Signer;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";
const DELIMITER: char = '.';

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Encodes claims into signed token strings and back
#[derive(Debug, Clone)]
pub struct ClaimCodec {
    signer: Signer,
    encoded_header: String,
}

impl ClaimCodec {
    pub fn new(signer: Signer) -> DomainResult<Self> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        };
        let header_json = serde_json::to_vec(&header).map_err(|e| TokenError::GenerationFailed {
            reason: e.to_string(),
        })?;

        Ok(Self {
            signer,
            encoded_header: URL_SAFE_NO_PAD.encode(header_json),
        })
    }

    /// Sign `claims` into a compact token string
    pub fn encode(&self, claims: &Claims) -> DomainResult<String> {
        claims
            .check_invariants()
            .map_err(|reason| TokenError::GenerationFailed { reason })?;

        let payload = serde_json::to_vec(claims).map_err(|e| TokenError::GenerationFailed {
            reason: e.to_string(),
        })?;

        let signing_input = format!(
            "{}{}{}",
            self.encoded_header,
            DELIMITER,
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self.signer.sign(signing_input.as_bytes())?;

        Ok(format!(
            "{}{}{}",
            signing_input,
            DELIMITER,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verify and parse `token`, then check expiry against `now`
    ///
    /// # Errors
    /// * `TokenError::Malformed` - wrong segment count, bad encoding, bad
    ///   signature, unsupported algorithm, or claims that break their invariants
    /// * `TokenError::Expired` - `now >= exp`
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Claims> {
        let claims = self.decode_verified(token)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired.into());
        }
        Ok(claims)
    }

    fn decode_verified(&self, token: &str) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split(DELIMITER).collect();
        let [header_b64, payload_b64, signature_b64] = segments.as_slice() else {
            return Err(TokenError::malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let header_bytes = decode_segment(header_b64, "header")?;
        let payload_bytes = decode_segment(payload_b64, "claims")?;
        let signature = decode_segment(signature_b64, "signature")?;

        let signing_input_len = header_b64.len() + 1 + payload_b64.len();
        if !self
            .signer
            .verify(&token.as_bytes()[..signing_input_len], &signature)
        {
            return Err(TokenError::malformed("signature mismatch"));
        }

        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|e| TokenError::malformed(format!("invalid header: {}", e)))?;
        if header.alg != ALGORITHM {
            return Err(TokenError::malformed(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }

        let claims: Claims = serde_json::from_slice(&payload_bytes)
            .map_err(|e| TokenError::malformed(format!("invalid claims: {}", e)))?;
        claims.check_invariants().map_err(TokenError::malformed)?;

        Ok(claims)
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, TokenError> {
    if segment.is_empty() {
        return Err(TokenError::malformed(format!("{} segment is empty", name)));
    }
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::malformed(format!("{} segment is not base64url", name)))
}
