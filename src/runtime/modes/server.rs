//! Server mode
//!
//! Serves public profile pages, avatars and health checks over HTTP.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::{AppStartTime, asset_routes, health_routes, profile_routes};
use crate::blob::LocalBlobStore;
use crate::runtime::lifetime;

/// Run the HTTP server until it stops or Ctrl+C is received
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let store = lifetime::startup::build_store()
        .await
        .context("Failed to prepare profile store")
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let config = crate::config::get_config();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let blobs = Arc::new(LocalBlobStore::from_config());
    let blob_base_url = blobs.public_base_url().to_string();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(blobs.clone()))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .service(health_routes())
            .service(profile_routes())
            .configure(|cfg| asset_routes(cfg, &blob_base_url))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown complete");
        }
    }

    Ok(())
}
