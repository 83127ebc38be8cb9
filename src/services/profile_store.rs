//! Profile and link management service
//!
//! `ProfileLinkStore` edits one in-memory `ProfileRecord` at a time and
//! writes every change through to the record store. Callers own the record
//! and hand it in as `&mut`, which serialises operations on it.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::gating::{self, ShareOutcome};
use super::share::{self, ShareLinks};
use super::snapshot;
use crate::auth::{AdminAuth, AdminAuthenticator};
use crate::blob::BlobStore;
use crate::errors::{BiolinkError, Result};
use crate::storage::{
    AccentColor, Icon, LinkEntry, ProfileMeta, ProfileRecord, RecordStore, normalize_handle,
};
use crate::utils::validate_handle;

// ============ Request DTOs ============

/// Input for a new link. `icon` and `accent_color` are raw strings,
/// resolved when the link is created.
#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub accent_color: Option<String>,
}

impl LinkDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Fields to change on an existing link; `None` keeps the current value.
/// A blank `icon` resets to the default glyph.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub tagline: Option<String>,
    pub avatar_ref: Option<String>,
    pub dark_mode: Option<bool>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.tagline.is_none()
            && self.avatar_ref.is_none()
            && self.dark_mode.is_none()
    }
}

// ============ ProfileLinkStore ============

pub struct ProfileLinkStore {
    records: Arc<dyn RecordStore>,
    authenticator: Arc<dyn AdminAuthenticator>,
    blobs: Arc<dyn BlobStore>,
    public_base_url: String,
}

/// Log collaborator failures at the call site; domain errors pass through quietly.
fn logged(operation: &str, handle: &str, err: BiolinkError) -> BiolinkError {
    match err {
        BiolinkError::BackendUnavailable(_)
        | BiolinkError::FileOperation(_)
        | BiolinkError::Serialization(_) => {
            error!("{} failed for '{}': {}", operation, handle, err);
        }
        _ => debug!("{} rejected for '{}': {}", operation, handle, err),
    }
    err
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BiolinkError::validation(format!(
            "Link {} must not be empty",
            field
        )));
    }
    Ok(())
}

fn file_extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

impl ProfileLinkStore {
    pub fn new(
        records: Arc<dyn RecordStore>,
        authenticator: Arc<dyn AdminAuthenticator>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            records,
            authenticator,
            blobs,
            public_base_url: String::new(),
        }
    }

    /// Origin the public pages are reachable at. Without one, profile
    /// URLs are root-relative.
    pub fn with_public_base_url(mut self, public_base_url: &str) -> Self {
        self.public_base_url = public_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn records(&self) -> &Arc<dyn RecordStore> {
        &self.records
    }

    pub fn authenticator(&self) -> Arc<dyn AdminAuthenticator> {
        self.authenticator.clone()
    }

    // ============ Profile lifecycle ============

    /// Create an empty profile. `Conflict` when the handle is taken in any case.
    pub async fn create_profile(&self, handle: &str) -> Result<ProfileRecord> {
        let handle = validate_handle(handle)?;

        let existing = self
            .records
            .find_profile(&handle)
            .await
            .map_err(|e| logged("create_profile", &handle, e))?;
        if existing.is_some() {
            return Err(BiolinkError::conflict(format!(
                "Handle '{}' is already taken",
                handle
            )));
        }

        let meta = ProfileMeta::new(&handle);
        self.records
            .insert_profile(&meta)
            .await
            .map_err(|e| logged("create_profile", &handle, e))?;

        info!("ProfileLinkStore: created profile '{}'", handle);
        Ok(ProfileRecord::new(meta, Vec::new()))
    }

    /// Case-insensitive lookup, links in ascending `sort_index`.
    pub async fn load(&self, handle: &str) -> Result<ProfileRecord> {
        let key = normalize_handle(handle);

        let meta = self
            .records
            .find_profile(&key)
            .await
            .map_err(|e| logged("load", &key, e))?
            .ok_or_else(|| BiolinkError::not_found(format!("Profile '{}' not found", key)))?;

        let links = self
            .records
            .list_links(&key)
            .await
            .map_err(|e| logged("load", &key, e))?;

        Ok(ProfileRecord::new(meta, links))
    }

    pub fn authenticate_admin(&self, secret: &str) -> AdminAuth {
        self.authenticator.authenticate(secret)
    }

    pub fn can_add_link(&self, profile: &ProfileRecord) -> bool {
        gating::can_add_link(profile)
    }

    // ============ Link CRUD ============

    pub async fn add_link(
        &self,
        profile: &mut ProfileRecord,
        draft: LinkDraft,
    ) -> Result<LinkEntry> {
        require_text("title", &draft.title)?;
        require_text("url", &draft.url)?;

        if !gating::can_add_link(profile) {
            return Err(BiolinkError::limit_reached(format!(
                "Free profiles hold {} links; share the page {} times to unlock more",
                gating::FREE_LINK_LIMIT,
                gating::SHARES_TO_UNLOCK
            )));
        }

        let sort_index = u32::try_from(profile.links.len())
            .map_err(|_| BiolinkError::validation("Profile holds too many links"))?;
        let link = LinkEntry {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            url: draft.url,
            icon: Some(
                draft
                    .icon
                    .as_deref()
                    .and_then(Icon::parse)
                    .unwrap_or_else(Icon::default_glyph),
            ),
            accent_color: AccentColor::from_tag(draft.accent_color.as_deref()),
            sort_index,
        };

        self.records
            .insert_link(profile.handle(), &link)
            .await
            .map_err(|e| logged("add_link", profile.handle(), e))?;
        profile.links.push(link.clone());

        info!(
            "ProfileLinkStore: added link '{}' -> '{}' to '{}'",
            link.title,
            link.url,
            profile.handle()
        );
        Ok(link)
    }

    pub async fn update_link(
        &self,
        profile: &mut ProfileRecord,
        id: &str,
        patch: LinkPatch,
    ) -> Result<LinkEntry> {
        let position = profile
            .position_of(id)
            .ok_or_else(|| BiolinkError::not_found(format!("Link '{}' not found", id)))?;

        let mut updated = profile.links[position].clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(url) = patch.url {
            updated.url = url;
        }
        if let Some(icon) = patch.icon {
            updated.icon = Some(Icon::parse(&icon).unwrap_or_else(Icon::default_glyph));
        }
        if let Some(color) = patch.accent_color {
            updated.accent_color = AccentColor::from_tag(Some(&color));
        }
        require_text("title", &updated.title)?;
        require_text("url", &updated.url)?;

        self.records
            .update_link(profile.handle(), &updated)
            .await
            .map_err(|e| logged("update_link", profile.handle(), e))?;
        profile.links[position] = updated.clone();

        info!("ProfileLinkStore: updated link '{}' of '{}'", id, profile.handle());
        Ok(updated)
    }

    /// No-op for unknown ids. Survivors are renumbered densely.
    pub async fn delete_link(&self, profile: &mut ProfileRecord, id: &str) -> Result<()> {
        let Some(position) = profile.position_of(id) else {
            debug!("delete_link: '{}' not in '{}', nothing to do", id, profile.handle());
            return Ok(());
        };

        self.records
            .delete_link(profile.handle(), id)
            .await
            .map_err(|e| logged("delete_link", profile.handle(), e))?;
        profile.links.remove(position);

        let changed = profile.renumber();
        self.persist_positions(profile, &changed, "delete_link")
            .await?;

        info!("ProfileLinkStore: deleted link '{}' of '{}'", id, profile.handle());
        Ok(())
    }

    /// Move the link at `from` to `to`, shifting the ones in between.
    ///
    /// `None` or an out-of-range index leaves everything untouched. Changed
    /// rows are written one by one in ascending position; a failed write
    /// stops the sequence and is returned, the new local order stays.
    pub async fn reorder<'a>(
        &self,
        profile: &'a mut ProfileRecord,
        from: usize,
        to: Option<usize>,
    ) -> Result<&'a ProfileRecord> {
        let len = profile.links.len();
        let Some(to) = to.filter(|&to| to < len && from < len) else {
            return Ok(&*profile);
        };

        let moved = profile.links.remove(from);
        profile.links.insert(to, moved);

        let changed = profile.renumber();
        self.persist_positions(profile, &changed, "reorder").await?;

        if !changed.is_empty() {
            info!(
                "ProfileLinkStore: moved link {} -> {} in '{}' ({} rows rewritten)",
                from,
                to,
                profile.handle(),
                changed.len()
            );
        }
        Ok(&*profile)
    }

    async fn persist_positions(
        &self,
        profile: &ProfileRecord,
        positions: &[usize],
        operation: &str,
    ) -> Result<()> {
        for &position in positions {
            self.records
                .update_link(profile.handle(), &profile.links[position])
                .await
                .map_err(|e| logged(operation, profile.handle(), e))?;
        }
        Ok(())
    }

    // ============ Import / export ============

    /// Replace metadata and links wholesale from a JSON document.
    ///
    /// Parse or validation errors change nothing. Links are written before
    /// metadata; when the metadata write then fails the previous links are
    /// written back, and only a failure of that restore leaves the backend
    /// with the new links next to the old metadata. The local record is
    /// replaced only after both writes succeed.
    pub async fn import_snapshot<'a>(
        &self,
        profile: &'a mut ProfileRecord,
        json: &str,
    ) -> Result<&'a ProfileRecord> {
        let document = snapshot::decode(json).map_err(|e| logged("import", profile.handle(), e))?;
        let imported = snapshot::merge(profile, document);

        self.records
            .replace_links(imported.handle(), &imported.links)
            .await
            .map_err(|e| logged("import", profile.handle(), e))?;

        if let Err(e) = self.records.update_profile(&imported.meta).await {
            if let Err(restore) = self
                .records
                .replace_links(profile.handle(), &profile.links)
                .await
            {
                error!(
                    "import: could not restore links of '{}': {}",
                    profile.handle(),
                    restore
                );
            }
            return Err(logged("import", profile.handle(), e));
        }

        info!(
            "ProfileLinkStore: imported {} links into '{}'",
            imported.links.len(),
            imported.handle()
        );
        *profile = imported;
        Ok(&*profile)
    }

    pub fn export_snapshot(&self, profile: &ProfileRecord) -> Result<String> {
        snapshot::encode(profile)
    }

    // ============ Metadata ============

    pub async fn record_share(&self, profile: &mut ProfileRecord) -> Result<ShareOutcome> {
        let mut meta = profile.meta.clone();
        let outcome = gating::apply_share(&mut meta);

        self.commit_meta(profile, meta, "record_share").await?;

        if outcome.just_unlocked {
            info!("ProfileLinkStore: '{}' unlocked unlimited links", profile.handle());
        }
        Ok(outcome)
    }

    /// Public page URL and the WhatsApp link that shares it.
    pub fn share_links(&self, profile: &ProfileRecord) -> ShareLinks {
        share::share_links(&self.public_base_url, profile.handle())
    }

    pub async fn update_profile(
        &self,
        profile: &mut ProfileRecord,
        patch: ProfilePatch,
    ) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut meta = profile.meta.clone();
        if let Some(display_name) = patch.display_name {
            meta.display_name = display_name;
        }
        if let Some(tagline) = patch.tagline {
            meta.tagline = tagline;
        }
        if let Some(avatar_ref) = patch.avatar_ref {
            meta.avatar_ref = avatar_ref;
        }
        if let Some(dark_mode) = patch.dark_mode {
            meta.dark_mode = dark_mode;
        }

        self.commit_meta(profile, meta, "update_profile").await?;
        info!("ProfileLinkStore: updated profile '{}'", profile.handle());
        Ok(())
    }

    /// Returns the new `dark_mode`.
    pub async fn toggle_theme(&self, profile: &mut ProfileRecord) -> Result<bool> {
        let mut meta = profile.meta.clone();
        meta.dark_mode = !meta.dark_mode;
        self.commit_meta(profile, meta, "toggle_theme").await?;
        Ok(profile.meta.dark_mode)
    }

    /// Upload under `{handle}-{unix_millis}.{ext}` and point `avatar_ref` at it.
    pub async fn upload_avatar(
        &self,
        profile: &mut ProfileRecord,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String> {
        if bytes.is_empty() {
            return Err(BiolinkError::validation("Avatar file is empty"));
        }

        let key = format!(
            "{}-{}.{}",
            profile.handle(),
            chrono::Utc::now().timestamp_millis(),
            file_extension(file_name)
        );
        let url = self
            .blobs
            .upload(&key, bytes)
            .await
            .map_err(|e| logged("upload_avatar", profile.handle(), e))?;

        let mut meta = profile.meta.clone();
        meta.avatar_ref = url.clone();
        self.commit_meta(profile, meta, "upload_avatar").await?;

        info!("ProfileLinkStore: new avatar for '{}': {}", profile.handle(), url);
        Ok(url)
    }

    async fn commit_meta(
        &self,
        profile: &mut ProfileRecord,
        meta: ProfileMeta,
        operation: &str,
    ) -> Result<()> {
        self.records
            .update_profile(&meta)
            .await
            .map_err(|e| logged(operation, profile.handle(), e))?;
        profile.meta = meta;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("me.PNG"), "png");
        assert_eq!(file_extension("/tmp/photo.final.jpeg"), "jpeg");
        assert_eq!(file_extension("noext"), "bin");
        assert_eq!(file_extension("weird.p/g"), "bin");
    }

    #[test]
    fn test_profile_patch_is_empty() {
        assert!(ProfilePatch::default().is_empty());
        let patch = ProfilePatch {
            dark_mode: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
