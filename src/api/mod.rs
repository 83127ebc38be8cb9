//! Public HTTP surface
//!
//! Read-only: profile pages with their avatar files, plus health checks.
//! All editing goes through the CLI.

pub mod response;
pub mod services;

pub use services::{AppStartTime, asset_routes, health_routes, profile_routes};
