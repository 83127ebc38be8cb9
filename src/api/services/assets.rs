use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::{debug, error, trace};

use crate::blob::LocalBlobStore;
use crate::errors::BiolinkError;
use crate::storage::DEFAULT_AVATAR_REF;

/// 内置默认头像
const DEFAULT_AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 96 96" width="96" height="96"><rect width="96" height="96" rx="48" fill="#e5e7eb"/><circle cx="48" cy="38" r="16" fill="#9ca3af"/><path d="M18 82c4-16 16-24 30-24s26 8 30 24" fill="#9ca3af"/></svg>"##;

pub struct AssetService;

impl AssetService {
    /// 处理上传的头像文件
    pub async fn handle_upload(
        path: web::Path<String>,
        blobs: web::Data<Arc<LocalBlobStore>>,
    ) -> HttpResponse {
        let key = path.into_inner();
        trace!("Serving uploaded file: {}", key);

        match blobs.read(&key).await {
            Ok(bytes) => HttpResponse::Ok()
                .content_type(Self::get_content_type(&key))
                .insert_header(("Cache-Control", "public, max-age=86400"))
                .body(bytes),
            Err(BiolinkError::BackendUnavailable(e)) => {
                error!("Upload '{}' unreadable: {}", key, e);
                HttpResponse::InternalServerError().body("File unavailable")
            }
            Err(e) => {
                debug!("Uploaded file not found: {} ({})", key, e);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    pub async fn handle_default_avatar() -> HttpResponse {
        HttpResponse::Ok()
            .content_type("image/svg+xml")
            .insert_header(("Cache-Control", "public, max-age=86400"))
            .body(DEFAULT_AVATAR_SVG)
    }

    /// 根据文件扩展名确定 Content-Type
    fn get_content_type(path: &str) -> &'static str {
        match path.rsplit('.').next() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            Some("ico") => "image/x-icon",
            _ => "application/octet-stream",
        }
    }
}

/// Path the blob store is mounted at, when it is served by this process.
/// Absolute URLs point at some other host and mount nothing.
fn mount_path(public_base_url: &str) -> Option<&str> {
    let prefix = public_base_url.trim_end_matches('/');
    (prefix.starts_with('/') && prefix.len() > 1).then_some(prefix)
}

/// Default avatar plus uploads under the blob store's public prefix.
/// Needs `web::Data<Arc<LocalBlobStore>>` in app data.
pub fn asset_routes(cfg: &mut web::ServiceConfig, blob_public_base_url: &str) {
    cfg.route(
        DEFAULT_AVATAR_REF,
        web::get().to(AssetService::handle_default_avatar),
    );

    match mount_path(blob_public_base_url) {
        Some(prefix) => {
            cfg.service(
                web::scope(prefix).route("/{key}", web::get().to(AssetService::handle_upload)),
            );
        }
        None => debug!(
            "Blob URL '{}' is not local, uploads are not served here",
            blob_public_base_url
        ),
    }
}
