//! Process configuration, read once at startup.

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

use flow_auth::{BcryptHasher, SigningSecret};

pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const PORT_VAR: &str = "PORT";
pub const BCRYPT_COST_VAR: &str = "BCRYPT_COST";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Startup-fatal: no token can be issued or validated without it.
    #[error("JWT_SECRET environment variable is required")]
    MissingSigningSecret,

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_secret: SigningSecret,
    pub hasher: BcryptHasher,
    pub port: u16,
}

impl AppConfig {
    /// Defaults for everything except the signing secret.
    pub fn new(signing_secret: SigningSecret) -> Self {
        Self {
            signing_secret,
            hasher: BcryptHasher::default(),
            port: DEFAULT_PORT,
        }
    }

    pub fn with_hasher(mut self, hasher: BcryptHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup(JWT_SECRET_VAR).ok_or(ConfigError::MissingSigningSecret)?;
        let signing_secret =
            SigningSecret::new(secret).map_err(|_| ConfigError::MissingSigningSecret)?;

        let mut config = Self::new(signing_secret);

        if let Some(port) = lookup(PORT_VAR).filter(|v| !v.trim().is_empty()) {
            config.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: PORT_VAR,
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(cost) = lookup(BCRYPT_COST_VAR).filter(|v| !v.trim().is_empty()) {
            let cost: u32 = cost.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: BCRYPT_COST_VAR,
                    reason: e.to_string(),
                }
            })?;
            config.hasher = BcryptHasher::new(cost).map_err(|e| ConfigError::Invalid {
                var: BCRYPT_COST_VAR,
                reason: e.to_string(),
            })?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Load a `.env` file if present. Call before logging is initialised; the
/// outcome is returned so it can be logged afterwards.
pub fn load_dotenv() -> Result<std::path::PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSigningSecret);
    }

    #[test]
    fn empty_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSigningSecret);
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "s")])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.hasher, BcryptHasher::default());
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (JWT_SECRET_VAR, "s"),
            (PORT_VAR, "9000"),
            (BCRYPT_COST_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.hasher.cost(), 5);
    }

    #[test]
    fn bad_values_are_rejected() {
        for (var, value) in [(PORT_VAR, "eighty"), (BCRYPT_COST_VAR, "2"), (BCRYPT_COST_VAR, "x")] {
            let err = AppConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "s"), (var, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: v, .. } if v == var));
        }
    }

    #[test]
    fn debug_does_not_print_secret() {
        let cfg = AppConfig::from_lookup(lookup(&[(JWT_SECRET_VAR, "topsecret")])).unwrap();
        assert!(!format!("{cfg:?}").contains("topsecret"));
    }
}
