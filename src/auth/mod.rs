//! Edit-mode gating and user sessions

pub mod admin;
pub mod edit_mode;
pub mod session;

pub use admin::{AdminAuth, AdminAuthenticator, StaticSecretAuthenticator};
pub use edit_mode::{EditSession, EditState};
pub use session::{
    Credentials, LocalSessionProvider, Session, SessionEvent, SessionProvider, ViewRoute,
};
