use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flow_core::UserId;

/// Fixed token lifetime (24h).
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Identity token claims.
///
/// Timestamps travel as JWT NumericDate (whole seconds), so they are truncated
/// to the second on construction to keep in-memory and decoded claims equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / principal identifier.
    pub sub: UserId,

    /// Issued-at timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Not-before timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub nbf: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl Claims {
    /// Claims for a token issued to `sub` at `now`.
    pub fn issue(sub: UserId, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(0);
        Self {
            sub,
            iat: now,
            nbf: now,
            exp: now + Duration::seconds(TOKEN_LIFETIME_SECS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (nbf is in the future)")]
    NotYetValid,

    #[error("invalid token time window")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of decoded claims.
///
/// A token is valid for `nbf <= now <= exp`. Signature verification happens
/// before this, in the token codec.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat || claims.nbf > claims.exp {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.nbf {
        return Err(TokenValidationError::NotYetValid);
    }
    if now > claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn issue_sets_24h_window() {
        let c = Claims::issue(UserId::new(), t0());
        assert_eq!(c.iat, t0());
        assert_eq!(c.nbf, t0());
        assert_eq!(c.exp - c.iat, Duration::hours(24));
    }

    #[test]
    fn issue_truncates_subseconds() {
        let now = t0() + Duration::milliseconds(750);
        let c = Claims::issue(UserId::new(), now);
        assert_eq!(c.iat, t0());
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let c = Claims::issue(UserId::new(), t0());
        assert_eq!(validate_claims(&c, c.nbf), Ok(()));
        assert_eq!(validate_claims(&c, c.exp), Ok(()));
    }

    #[test]
    fn one_second_past_expiry_is_rejected() {
        let c = Claims::issue(UserId::new(), t0());
        assert_eq!(
            validate_claims(&c, c.exp + Duration::seconds(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn before_nbf_is_rejected() {
        let c = Claims::issue(UserId::new(), t0());
        assert_eq!(
            validate_claims(&c, t0() - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut c = Claims::issue(UserId::new(), t0());
        c.exp = c.iat;
        assert_eq!(validate_claims(&c, t0()), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn timestamps_serialize_as_numeric_dates() {
        let c = Claims::issue(UserId::new(), t0());
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_000 + TOKEN_LIFETIME_SECS);
    }
}
