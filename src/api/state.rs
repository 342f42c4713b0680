//! Application state shared across handlers.

use hmac::{Hmac, Mac};
use sea_orm::DatabaseConnection;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;

use super::nonce::NonceKey;
use crate::config::{AdminAccount, AppConfig, PluginProfile};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    db: DatabaseConnection,
    nonce_key: NonceKey,
}

impl AppState {
    /// Builds the state once at startup.
    #[must_use]
    pub fn new(config: AppConfig, db: DatabaseConnection, nonce_secret: SecretString) -> Self {
        let nonce_key = NonceKey::new(nonce_secret, config.nonce_lifetime_secs);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                nonce_key,
            }),
        }
    }

    /// Loaded configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Database connection pool
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.inner.db
    }

    /// Nonce signing key
    #[must_use]
    pub fn nonce_key(&self) -> &NonceKey {
        &self.inner.nonce_key
    }

    /// Plugin variant being served
    #[must_use]
    pub fn profile(&self) -> PluginProfile {
        self.inner.config.profile
    }

    /// Admin account owning `token`, if any.
    #[must_use]
    pub fn admin_by_token(&self, token: &str) -> Option<&AdminAccount> {
        self.inner
            .config
            .admins
            .iter()
            .find(|admin| token_matches(token, &admin.token))
    }
}

/// Constant-time token comparison: both sides are MACed under the stored
/// token and the fixed-length tags compared with `verify_slice`.
fn token_matches(presented: &str, expected: &SecretString) -> bool {
    let key = expected.expose_secret().as_bytes();
    let (Ok(mut presented_mac), Ok(mut expected_mac)) = (
        Hmac::<Sha256>::new_from_slice(key),
        Hmac::<Sha256>::new_from_slice(key),
    ) else {
        return false;
    };
    presented_mac.update(presented.as_bytes());
    expected_mac.update(key);
    presented_mac
        .verify_slice(&expected_mac.finalize().into_bytes())
        .is_ok()
}
