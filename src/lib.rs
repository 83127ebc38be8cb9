//! Biolink - a link-in-bio profile service
//!
//! One public profile per handle with an ordered list of links. Editing is
//! gated behind an admin secret, free profiles hold a limited number of
//! links until the page has been shared, and profiles round-trip through
//! a JSON document for backup and migration.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface
//!
//! # Architecture
//! - `storage`: Record store backends (SQL via SeaORM, JSON file, memory)
//! - `services`: `ProfileLinkStore`, share gating, import/export
//! - `auth`: Admin secret, edit mode and user sessions
//! - `blob`: Avatar uploads
//! - `api`: HTTP routes
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

#[cfg(feature = "server")]
pub mod api;
pub mod auth;
pub mod blob;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
