use tracing::{debug, warn};

use crate::errors::Result;
use crate::utils::password::{prepare_secret, verify_password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuth {
    Granted,
    Denied,
}

impl AdminAuth {
    pub fn is_granted(self) -> bool {
        self == AdminAuth::Granted
    }
}

/// Decides whether a secret unlocks edit mode. Never errors: anything
/// that cannot be verified is `Denied`.
pub trait AdminAuthenticator: Send + Sync {
    fn authenticate(&self, secret: &str) -> AdminAuth;
}

/// A single shared secret kept as an Argon2id hash.
pub struct StaticSecretAuthenticator {
    secret_hash: Option<String>,
}

impl StaticSecretAuthenticator {
    /// `configured` may be plaintext or an Argon2 hash; empty disables edit mode.
    pub fn new(configured: &str) -> Result<Self> {
        if configured.is_empty() {
            warn!("Admin secret is not configured, edit mode is disabled");
            return Ok(Self { secret_hash: None });
        }
        Ok(Self {
            secret_hash: Some(prepare_secret(configured)?),
        })
    }

    pub fn from_config() -> Result<Self> {
        Self::new(&crate::config::get_config().admin.secret)
    }
}

impl AdminAuthenticator for StaticSecretAuthenticator {
    fn authenticate(&self, secret: &str) -> AdminAuth {
        let Some(hash) = self.secret_hash.as_deref() else {
            return AdminAuth::Denied;
        };
        match verify_password(secret, hash) {
            Ok(true) => AdminAuth::Granted,
            Ok(false) => {
                debug!("Admin secret rejected");
                AdminAuth::Denied
            }
            Err(e) => {
                warn!("Admin secret verification failed: {}", e);
                AdminAuth::Denied
            }
        }
    }
}
