use std::path::Path;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::{DEFAULT_CONFIG_PATH, StaticConfig};
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to `config.toml` + environment
/// when nothing was initialised explicitly.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(load_or_default(Path::new(DEFAULT_CONFIG_PATH))))
        .load_full()
}

/// Initialize the global configuration from `config.toml`
pub fn init_config() {
    let _ = get_config();
}

/// Initialize the global configuration from an explicit file
///
/// A file that fails to parse is a hard error here, unlike the implicit
/// default path.
pub fn init_config_from(path: &Path) -> Result<()> {
    set_config(StaticConfig::load(path)?);
    Ok(())
}

/// Replace the active configuration
pub fn set_config(config: StaticConfig) {
    let config = Arc::new(config);
    CONFIG
        .get_or_init(|| ArcSwap::new(config.clone()))
        .store(config);
}

fn load_or_default(path: &Path) -> StaticConfig {
    StaticConfig::load(path).unwrap_or_else(|e| {
        eprintln!("[ERROR] {}", e);
        StaticConfig::default()
    })
}
