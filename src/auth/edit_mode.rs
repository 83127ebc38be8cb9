//! Viewer / PendingAuth / Editor state machine
//!
//! Events that do not apply to the current state are ignored.

use std::sync::Arc;

use tracing::info;

use super::admin::{AdminAuth, AdminAuthenticator};

pub const REJECTION_MESSAGE: &str = "Incorrect admin secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewer,
    PendingAuth,
    Editor,
}

pub struct EditSession {
    state: EditState,
    last_error: Option<String>,
    authenticator: Arc<dyn AdminAuthenticator>,
}

impl EditSession {
    pub fn new(authenticator: Arc<dyn AdminAuthenticator>) -> Self {
        Self {
            state: EditState::Viewer,
            last_error: None,
            authenticator,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn can_edit(&self) -> bool {
        self.state == EditState::Editor
    }

    /// Rejection message of the last failed submit, cleared on success or cancel.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn open_login_dialog(&mut self) -> EditState {
        if self.state == EditState::Viewer {
            self.state = EditState::PendingAuth;
        }
        self.state
    }

    pub fn submit(&mut self, secret: &str) -> EditState {
        if self.state != EditState::PendingAuth {
            return self.state;
        }
        match self.authenticator.authenticate(secret) {
            AdminAuth::Granted => {
                info!("Edit mode unlocked");
                self.state = EditState::Editor;
                self.last_error = None;
            }
            AdminAuth::Denied => {
                self.last_error = Some(REJECTION_MESSAGE.to_string());
            }
        }
        self.state
    }

    pub fn cancel(&mut self) -> EditState {
        if self.state == EditState::PendingAuth {
            self.state = EditState::Viewer;
            self.last_error = None;
        }
        self.state
    }

    pub fn logout(&mut self) -> EditState {
        if self.state == EditState::Editor {
            info!("Edit mode closed");
            self.state = EditState::Viewer;
        }
        self.state
    }
}
