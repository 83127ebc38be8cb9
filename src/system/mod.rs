//! System-level modules
//!
//! Process-wide concerns that are not part of the profile domain.

pub mod logging;
