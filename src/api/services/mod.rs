pub mod assets;
pub mod health;
pub mod profile;

pub use assets::{AssetService, asset_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use profile::{ProfileService, PublicLink, PublicProfile, profile_routes};
