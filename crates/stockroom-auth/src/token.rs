//! # Token Issuance & Verification
//!
//! HS256 JWTs signed with the process-wide secret, carrying the caller's
//! identity (`sub` = user id hex, email, roles) and expiring 24 hours
//! after issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, RoleSet};

/// Token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's identifier, as its 24-hex string.
    pub sub: String,
    /// The user's email at issuance time.
    pub email: String,
    /// The user's roles at issuance time.
    pub roles: RoleSet,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issue a signed token for the given identity.
pub fn issue(
    secret: &str,
    user_id: &str,
    email: &str,
    roles: RoleSet,
) -> Result<String, DomainError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        roles,
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::Internal(format!("token signing failed: {e}")))
}

/// Verify a token and return its claims.
///
/// Fails closed: malformed structure, bad signature, and expiry all yield
/// `None`. Never returns an error to the caller.
pub fn verify(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Strip the `Bearer ` scheme from an Authorization header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Role;

    const SECRET: &str = "test-signing-secret";

    fn roles() -> RoleSet {
        RoleSet::user_default()
    }

    #[test]
    fn test_issue_then_verify_round_trips() {
        let token = issue(SECRET, "507f1f77bcf86cd799439011", "john@example.com", roles()).unwrap();
        let claims = verify(SECRET, &token).expect("token should verify");

        assert_eq!(claims.sub, "507f1f77bcf86cd799439011");
        assert_eq!(claims.email, "john@example.com");
        assert!(claims.roles.contains(Role::User));
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_tampered_token_fails_closed() {
        let token = issue(SECRET, "507f1f77bcf86cd799439011", "john@example.com", roles()).unwrap();

        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();

        assert!(verify(SECRET, &parts.join(".")).is_none());
    }

    #[test]
    fn test_wrong_secret_fails_closed() {
        let token = issue(SECRET, "507f1f77bcf86cd799439011", "john@example.com", roles()).unwrap();
        assert!(verify("other-secret", &token).is_none());
    }

    #[test]
    fn test_garbage_tokens_fail_closed() {
        assert!(verify(SECRET, "").is_none());
        assert!(verify(SECRET, "not-a-token").is_none());
        assert!(verify(SECRET, "a.b.c").is_none());
    }

    #[test]
    fn test_expired_token_fails_closed() {
        // Hand-build claims already past expiry (beyond validation leeway).
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "507f1f77bcf86cd799439011".into(),
            email: "john@example.com".into(),
            roles: roles(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify(SECRET, &token).is_none());
    }

    #[test]
    fn test_bearer_scheme_stripping() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }
}
