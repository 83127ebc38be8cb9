use std::sync::Arc;

use actix_web::{Responder, web};
use serde::Serialize;
use tracing::{debug, trace};

use crate::api::response::{error_response, success_response};
use crate::services::ProfileLinkStore;
use crate::storage::ProfileRecord;

/// What a visitor sees. Share counters stay private.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub handle: String,
    pub display_name: String,
    pub tagline: String,
    pub avatar_ref: String,
    pub theme_preference: bool,
    pub links: Vec<PublicLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon_glyph: String,
    pub icon_is_image: bool,
    pub accent_color: String,
}

impl From<ProfileRecord> for PublicProfile {
    fn from(record: ProfileRecord) -> Self {
        let links = record
            .links
            .into_iter()
            .map(|link| {
                let icon = link.icon.unwrap_or_else(crate::storage::Icon::default_glyph);
                PublicLink {
                    id: link.id,
                    title: link.title,
                    url: link.url,
                    icon_glyph: icon.as_raw().to_string(),
                    icon_is_image: icon.is_external(),
                    accent_color: link.accent_color.to_string(),
                }
            })
            .collect();

        let meta = record.meta;
        Self {
            handle: meta.handle,
            display_name: meta.display_name,
            tagline: meta.tagline,
            avatar_ref: meta.avatar_ref,
            theme_preference: meta.dark_mode,
            links,
        }
    }
}

pub struct ProfileService;

impl ProfileService {
    pub async fn get_profile(
        path: web::Path<String>,
        store: web::Data<Arc<ProfileLinkStore>>,
    ) -> impl Responder {
        let handle = path.into_inner();
        trace!("Public profile request: {}", handle);

        match store.load(&handle).await {
            Ok(record) => success_response(PublicProfile::from(record)),
            Err(e) => {
                debug!("Profile '{}' unavailable: {}", handle, e);
                error_response(&e)
            }
        }
    }
}

/// 公开 profile 路由
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/u").route("/{handle}", web::get().to(ProfileService::get_profile))
}
