//! Sign-up / sign-in flow tying sessions to profiles

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::profile_store::ProfileLinkStore;
use crate::auth::{Credentials, Session, SessionEvent, SessionProvider, ViewRoute};
use crate::errors::{BiolinkError, Result};
use crate::storage::ProfileRecord;
use crate::utils::validate_handle;

pub struct AccountService {
    sessions: Arc<dyn SessionProvider>,
    profiles: Arc<ProfileLinkStore>,
}

impl AccountService {
    pub fn new(sessions: Arc<dyn SessionProvider>, profiles: Arc<ProfileLinkStore>) -> Self {
        Self { sessions, profiles }
    }

    /// Register an account and create its profile.
    ///
    /// The handle is checked before the account exists, so a taken handle
    /// never leaves an orphan account behind.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        handle: &str,
    ) -> Result<(Session, ProfileRecord)> {
        let handle = validate_handle(handle)?;

        if self.profiles.records().find_profile(&handle).await?.is_some() {
            return Err(BiolinkError::conflict(format!(
                "Handle '{}' is already taken",
                handle
            )));
        }

        let credentials = Credentials::new(email, password).with_handle(handle.clone());
        let session = self.sessions.sign_up(&credentials).await?;
        let profile = self.profiles.create_profile(&handle).await?;

        info!("Account created for '{}'", handle);
        Ok((session, profile))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.sessions
            .sign_in(&Credentials::new(email, password))
            .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.sessions.sign_out().await
    }

    pub async fn current_route(&self) -> ViewRoute {
        ViewRoute::for_session(self.sessions.current_session().await.as_ref())
    }

    /// Follow session changes and keep the current route up to date.
    ///
    /// Spawns a task that stops once every receiver is dropped or the
    /// provider goes away. Must be called inside a tokio runtime.
    pub async fn watch_routes(&self) -> watch::Receiver<ViewRoute> {
        let mut events = self.sessions.subscribe();
        let (tx, rx) = watch::channel(self.current_route().await);
        let sessions = self.sessions.clone();

        tokio::spawn(async move {
            loop {
                let route = match events.recv().await {
                    Ok(SessionEvent::SignedIn(session)) => ViewRoute::for_session(Some(&session)),
                    Ok(SessionEvent::SignedOut) => ViewRoute::Anonymous,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // 丢了事件，直接按当前会话重算
                        warn!("Route watcher skipped {} session events", skipped);
                        ViewRoute::for_session(sessions.current_session().await.as_ref())
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if tx.send(route).is_err() {
                    break;
                }
            }
            debug!("Route watcher stopped");
        });

        rx
    }
}
