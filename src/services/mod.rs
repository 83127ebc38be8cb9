//! Service layer
//!
//! Domain logic shared by the HTTP surface and the CLI.

pub mod account;
pub mod gating;
pub mod profile_store;
pub mod share;
pub mod snapshot;

pub use account::AccountService;
pub use gating::{FREE_LINK_LIMIT, SHARES_TO_UNLOCK, ShareOutcome};
pub use profile_store::{LinkDraft, LinkPatch, ProfileLinkStore, ProfilePatch};
pub use share::ShareLinks;
pub use snapshot::{ProfileSnapshot, SnapshotLink};
