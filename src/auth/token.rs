use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Sessions last exactly this long from issuance.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Every verification failure collapses into this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken;

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, AppError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expires_at = now + Duration::days(TOKEN_TTL_DAYS);
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, InvalidToken> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthUser, InvalidToken> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| InvalidToken)?;
        let claims = data.claims;

        if claims.exp <= now.timestamp() || claims.exp - claims.iat != TOKEN_TTL_DAYS * 86_400 {
            return Err(InvalidToken);
        }

        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn round_trips_identity() {
        let codec = codec();
        let token = codec.issue("user-1", "ana@x.com").unwrap();
        let user = codec.verify(&token).unwrap();
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.email, "ana@x.com");
    }

    #[test]
    fn valid_for_seven_days() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec.issue_at("user-1", "ana@x.com", issued).unwrap();

        assert!(codec.verify_at(&token, issued + Duration::days(6)).is_ok());
        assert_eq!(
            codec.verify_at(&token, issued + Duration::days(8)),
            Err(InvalidToken)
        );
        assert_eq!(
            codec.verify_at(&token, issued + Duration::days(TOKEN_TTL_DAYS)),
            Err(InvalidToken)
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue("user-1", "ana@x.com").unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let pos = sig_start + 5;
        let original = token.as_bytes()[pos];
        let replacement = if original == b'A' { 'Z' } else { 'A' };

        let mut tampered = token.clone();
        tampered.replace_range(pos..=pos, &replacement.to_string());

        assert_ne!(tampered, token);
        assert_eq!(codec.verify(&tampered), Err(InvalidToken));
    }

    #[test]
    fn other_secrets_and_garbage_are_rejected() {
        let token = codec().issue("user-1", "ana@x.com").unwrap();
        assert_eq!(TokenCodec::new("other").verify(&token), Err(InvalidToken));
        assert_eq!(codec().verify("not.a.token"), Err(InvalidToken));
        assert_eq!(codec().verify(""), Err(InvalidToken));
    }

    #[test]
    fn expiry_is_issued_at_plus_seven_days() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec.issue_at("user-1", "ana@x.com", issued).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap()
        .claims;
        assert_eq!(claims.exp - claims.iat, 7 * 86_400);
    }
}
