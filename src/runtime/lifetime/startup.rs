//! Startup wiring shared by server and CLI modes

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::StaticSecretAuthenticator;
use crate::blob::LocalBlobStore;
use crate::errors::Result;
use crate::services::ProfileLinkStore;
use crate::storage::StorageFactory;

/// Build the profile store from the active configuration
///
/// Opens the configured record store (running migrations for SQL
/// backends), the admin authenticator and the local blob store.
pub async fn build_store() -> Result<Arc<ProfileLinkStore>> {
    let start_time = std::time::Instant::now();
    debug!("Preparing profile store...");

    let records = StorageFactory::create().await?;
    let authenticator = Arc::new(StaticSecretAuthenticator::from_config()?);
    let blobs = Arc::new(LocalBlobStore::from_config());

    debug!("Blob root: {}", blobs.root().display());
    info!(
        "Profile store ready on '{}' backend in {:?}",
        records.backend_name(),
        start_time.elapsed()
    );

    let store = ProfileLinkStore::new(records, authenticator, blobs)
        .with_public_base_url(&crate::config::get_config().server.public_base_url);
    Ok(Arc::new(store))
}
