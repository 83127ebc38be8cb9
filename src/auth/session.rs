//! User sessions
//!
//! `SessionProvider` is the contract of the hosted auth service;
//! `LocalSessionProvider` keeps accounts in process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::errors::{BiolinkError, Result};
use crate::utils::password::{hash_password, verify_password};

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Profile handle attached as account metadata on sign-up.
    pub handle: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            handle: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

/// Where a visitor lands given their session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRoute {
    Anonymous,
    Owner(String),
}

impl ViewRoute {
    pub fn for_session(session: Option<&Session>) -> Self {
        match session.and_then(|s| s.handle.clone()) {
            Some(handle) => ViewRoute::Owner(handle),
            None => ViewRoute::Anonymous,
        }
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `AuthDenied` on unknown email or wrong password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    /// `Conflict` when the email is already registered.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session>;

    async fn current_session(&self) -> Option<Session>;

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    async fn sign_out(&self) -> Result<()>;
}

struct Account {
    user_id: String,
    password_hash: String,
    handle: Option<String>,
}

pub struct LocalSessionProvider {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for LocalSessionProvider {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            events,
        }
    }
}

impl LocalSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn activate(&self, session: Session) -> Session {
        *self.current.write() = Some(session.clone());
        // 没有订阅者时 send 会失败，忽略即可
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));
        session
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let email = normalize_email(&credentials.email);
        let session = {
            let accounts = self.accounts.read();
            let account = accounts
                .get(&email)
                .ok_or_else(|| BiolinkError::auth_denied("Invalid email or password"))?;

            match verify_password(&credentials.password, &account.password_hash) {
                Ok(true) => {}
                Ok(false) => return Err(BiolinkError::auth_denied("Invalid email or password")),
                Err(e) => {
                    warn!("Stored password hash for {} is unusable: {}", email, e);
                    return Err(BiolinkError::auth_denied("Invalid email or password"));
                }
            }

            Session {
                user_id: account.user_id.clone(),
                email: email.clone(),
                handle: account.handle.clone(),
            }
        };

        info!("User signed in: {}", email);
        Ok(self.activate(session))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session> {
        let email = normalize_email(&credentials.email);
        if email.is_empty() || !email.contains('@') {
            return Err(BiolinkError::validation("A valid email address is required"));
        }
        if credentials.password.is_empty() {
            return Err(BiolinkError::validation("Password must not be empty"));
        }

        let password_hash = hash_password(&credentials.password)?;
        let session = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(&email) {
                return Err(BiolinkError::conflict(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }
            let account = Account {
                user_id: uuid::Uuid::new_v4().to_string(),
                password_hash,
                handle: credentials.handle.clone(),
            };
            let session = Session {
                user_id: account.user_id.clone(),
                email: email.clone(),
                handle: account.handle.clone(),
            };
            accounts.insert(email.clone(), account);
            session
        };

        info!("User signed up: {}", email);
        Ok(self.activate(session))
    }

    async fn current_session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn sign_out(&self) -> Result<()> {
        if self.current.write().take().is_some() {
            let _ = self.events.send(SessionEvent::SignedOut);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_route() {
        assert_eq!(ViewRoute::for_session(None), ViewRoute::Anonymous);

        let mut session = Session {
            user_id: "u1".to_string(),
            email: "a@example.com".to_string(),
            handle: None,
        };
        assert_eq!(ViewRoute::for_session(Some(&session)), ViewRoute::Anonymous);

        session.handle = Some("alice".to_string());
        assert_eq!(
            ViewRoute::for_session(Some(&session)),
            ViewRoute::Owner("alice".to_string())
        );
    }
}
