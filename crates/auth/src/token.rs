//! Signed, expiring identity tokens (JWT, HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use flow_core::UserId;

use crate::claims::{Claims, validate_claims};

/// The only algorithm tokens are signed with, and the only one accepted.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC signing secret. `Debug` never prints the key material.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("signing secret must not be empty")]
pub struct EmptySigningSecret;

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, EmptySigningSecret> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(EmptySigningSecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Any validation failure. Deliberately carries no reason.
    #[error("invalid or expired token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Token validation contract used by the request pipeline.
pub trait TokenValidator: Send + Sync {
    /// Verify `token` at instant `now` and return the embedded identity.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError>;
}

/// Issues and validates HS256 identity tokens.
#[derive(Clone)]
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Time checks run in `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `sub`, valid from `now` for 24 hours.
    pub fn issue(&self, sub: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::issue(sub, now);
        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenValidator for Hs256TokenCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = %e, "token rejected");
                TokenError::Invalid
            })?;

        validate_claims(&data.claims, now).map_err(|e| {
            tracing::debug!(reason = %e, "token rejected");
            TokenError::Invalid
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use uuid::Uuid;

    use crate::claims::TOKEN_LIFETIME_SECS;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn codec(secret: &str) -> Hs256TokenCodec {
        Hs256TokenCodec::new(&SigningSecret::new(secret).unwrap())
    }

    fn segments(token: &str) -> Vec<&str> {
        token.split('.').collect()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(SigningSecret::new("").unwrap_err(), EmptySigningSecret);
        assert_eq!(format!("{:?}", SigningSecret::new("k").unwrap()), "SigningSecret(<redacted>)");
    }

    #[test]
    fn issued_token_validates_to_same_identity() {
        let c = codec("secret");
        let user = UserId::new();
        let token = c.issue(user, t0()).unwrap();
        assert_eq!(c.validate(&token, t0()), Ok(user));
    }

    #[test]
    fn tokens_issued_at_different_instants_differ() {
        let c = codec("secret");
        let user = UserId::new();
        let a = c.issue(user, t0()).unwrap();
        let b = c.issue(user, t0() + Duration::seconds(1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn expired_token_is_rejected() {
        let c = codec("secret");
        let token = c.issue(UserId::new(), t0()).unwrap();
        let later = t0() + Duration::seconds(TOKEN_LIFETIME_SECS + 1);
        assert_eq!(c.validate(&token, later), Err(TokenError::Invalid));
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let c = codec("secret");
        let token = c.issue(UserId::new(), t0()).unwrap();
        assert_eq!(c.validate(&token, t0() - Duration::seconds(1)), Err(TokenError::Invalid));
    }

    #[test]
    fn token_from_other_key_is_rejected_like_expired() {
        let token = codec("other").issue(UserId::new(), t0()).unwrap();
        let expired = codec("secret").validate(
            &codec("secret").issue(UserId::new(), t0()).unwrap(),
            t0() + Duration::days(2),
        );
        assert_eq!(codec("secret").validate(&token, t0()), expired);
    }

    #[test]
    fn altered_payload_is_rejected() {
        let c = codec("secret");
        let genuine = c.issue(UserId::new(), t0()).unwrap();
        let forged = codec("attacker").issue(UserId::new(), t0()).unwrap();

        let g = segments(&genuine);
        let f = segments(&forged);
        let spliced = format!("{}.{}.{}", g[0], f[1], g[2]);

        assert_eq!(c.validate(&spliced, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn other_algorithm_with_same_secret_is_rejected() {
        let claims = Claims::issue(UserId::new(), t0());
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(codec("secret").validate(&token, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"} . {"sub":"x"} . <empty>
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJ4In0.";
        assert_eq!(codec("secret").validate(token, t0()), Err(TokenError::Invalid));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let c = codec("secret");
        for token in ["", "abc", "a.b.c", "...."] {
            assert_eq!(c.validate(token, t0()), Err(TokenError::Invalid));
        }
    }

    #[test]
    fn token_missing_nbf_is_rejected() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: UserId,
            iat: i64,
            exp: i64,
        }
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: UserId::new(),
                iat: t0().timestamp(),
                exp: t0().timestamp() + 60,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert_eq!(codec("secret").validate(&token, t0()), Err(TokenError::Invalid));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn validate_inverts_issue(raw in any::<u128>(), offset in 0i64..=TOKEN_LIFETIME_SECS) {
            let c = codec("prop-secret");
            let user = UserId::from_uuid(Uuid::from_u128(raw));
            let token = c.issue(user, t0()).unwrap();
            prop_assert_eq!(c.validate(&token, t0() + Duration::seconds(offset)), Ok(user));
        }
    }
}
