//! CLI command implementations

mod config_gen;
mod links;
mod profiles;
mod snapshots;

pub use config_gen::*;
pub use links::*;
pub use profiles::*;
pub use snapshots::*;
