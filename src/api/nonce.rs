//! Time-limited request tokens bound to an action and an admin.
//!
//! A nonce is the first ten hex digits of
//! `HMAC-SHA256(secret, "{tick}|{action}|{login}")`, where the tick advances
//! every half lifetime. Nonces from the current and the previous tick verify,
//! so a nonce lives between half and a full lifetime.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of hex digits in an issued nonce.
pub const NONCE_LENGTH: usize = 10;

/// Signing key plus lifetime.
#[derive(Debug)]
pub struct NonceKey {
    secret: SecretString,
    lifetime_secs: u64,
}

impl NonceKey {
    /// Builds a key. Lifetimes below two seconds are raised to two.
    #[must_use]
    pub fn new(secret: SecretString, lifetime_secs: u64) -> Self {
        Self {
            secret,
            lifetime_secs: lifetime_secs.max(2),
        }
    }

    /// Tick containing `now_secs`.
    #[must_use]
    pub const fn tick(&self, now_secs: u64) -> u64 {
        now_secs.div_ceil(self.lifetime_secs / 2)
    }

    fn mac(&self, tick: u64, action: &str, login: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()).ok()?;
        mac.update(format!("{tick}|{action}|{login}").as_bytes());
        Some(mac)
    }

    /// Issues a nonce for `action` and `login` at `now_secs`.
    #[must_use]
    pub fn create_at(&self, action: &str, login: &str, now_secs: u64) -> String {
        self.mac(self.tick(now_secs), action, login)
            .map(|mac| {
                let mut digest = hex::encode(mac.finalize().into_bytes());
                digest.truncate(NONCE_LENGTH);
                digest
            })
            .unwrap_or_default()
    }

    /// Checks `nonce` against the current and previous tick at `now_secs`.
    #[must_use]
    pub fn verify_at(&self, nonce: &str, action: &str, login: &str, now_secs: u64) -> bool {
        if nonce.len() != NONCE_LENGTH {
            return false;
        }
        let Ok(expected) = hex::decode(nonce.to_ascii_lowercase()) else {
            return false;
        };

        let tick = self.tick(now_secs);
        [Some(tick), tick.checked_sub(1)]
            .into_iter()
            .flatten()
            .filter_map(|t| self.mac(t, action, login))
            .any(|mac| mac.verify_truncated_left(&expected).is_ok())
    }

    /// Issues a nonce valid from now.
    #[must_use]
    pub fn create(&self, action: &str, login: &str) -> String {
        self.create_at(action, login, now_secs())
    }

    /// Checks `nonce` against the current clock.
    #[must_use]
    pub fn verify(&self, nonce: &str, action: &str, login: &str) -> bool {
        self.verify_at(nonce, action, login, now_secs())
    }
}

fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
