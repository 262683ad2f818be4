//! HS256 JWT issuance and verification.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Claims carried by an issued token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username the token was issued to.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: u64,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Issue a token for `username`, valid for `ttl_secs`.
pub fn issue_token(username: &str, secret: &str, ttl_secs: u64) -> Result<String, AuthError> {
    let iat = now_secs();
    let claims = Claims {
        sub: username.to_string(),
        iat,
        exp: iat + ttl_secs,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verify a token's signature and expiry, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token("ada", "secret", 3600).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "ada");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("ada", "secret", 3600).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("ada", "secret", 0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(verify_token("not.a.token", "secret").is_err());
    }

    #[test]
    fn ttl_sets_expiry() {
        let token = issue_token("ada", "secret", 7200).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.exp - claims.iat, 7200);
    }
}
