use std::sync::Arc;

use flow_auth::{AccountStore, Authenticator, CredentialHasher, Hs256TokenCodec};
use flow_breakdowns::BreakdownStore;
use flow_infra::store::{InMemoryAccountStore, InMemoryBreakdownStore};

use crate::config::AppConfig;

/// Handles shared by every request. Built once by the process root and
/// passed down; read-only afterwards.
#[derive(Clone)]
pub struct AppServices {
    pub authenticator: Arc<Authenticator>,
    pub tokens: Arc<Hs256TokenCodec>,
    pub breakdowns: Arc<dyn BreakdownStore>,
}

impl AppServices {
    pub fn new(
        config: &AppConfig,
        accounts: Arc<dyn AccountStore>,
        breakdowns: Arc<dyn BreakdownStore>,
    ) -> Self {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(config.hasher);
        Self {
            authenticator: Arc::new(Authenticator::new(accounts, hasher)),
            tokens: Arc::new(Hs256TokenCodec::new(&config.signing_secret)),
            breakdowns,
        }
    }
}

/// In-memory store wiring (dev/test).
pub fn build_services(config: &AppConfig) -> AppServices {
    let accounts: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
    let breakdowns: Arc<dyn BreakdownStore> = Arc::new(InMemoryBreakdownStore::new());
    AppServices::new(config, accounts, breakdowns)
}
