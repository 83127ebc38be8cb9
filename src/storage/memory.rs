use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::RecordStore;
use super::models::{LinkEntry, ProfileMeta, normalize_handle};
use crate::errors::{BiolinkError, Result};

/// Volatile backend, used for tests and `storage.backend = "memory"`.
#[derive(Default)]
pub struct MemoryStorage {
    profiles: RwLock<HashMap<String, ProfileMeta>>,
    links: RwLock<HashMap<String, Vec<LinkEntry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStorage {
    async fn find_profile(&self, handle: &str) -> Result<Option<ProfileMeta>> {
        Ok(self.profiles.read().get(&normalize_handle(handle)).cloned())
    }

    async fn insert_profile(&self, meta: &ProfileMeta) -> Result<()> {
        let key = normalize_handle(&meta.handle);
        let mut profiles = self.profiles.write();
        if profiles.contains_key(&key) {
            return Err(BiolinkError::conflict(format!(
                "Profile '{}' already exists",
                key
            )));
        }
        let mut meta = meta.clone();
        meta.handle = key.clone();
        profiles.insert(key, meta);
        Ok(())
    }

    async fn update_profile(&self, meta: &ProfileMeta) -> Result<()> {
        let key = normalize_handle(&meta.handle);
        let mut profiles = self.profiles.write();
        let slot = profiles
            .get_mut(&key)
            .ok_or_else(|| BiolinkError::not_found(format!("Profile '{}' not found", key)))?;
        *slot = meta.clone();
        slot.handle = key;
        Ok(())
    }

    async fn list_links(&self, handle: &str) -> Result<Vec<LinkEntry>> {
        let mut links = self
            .links
            .read()
            .get(&normalize_handle(handle))
            .cloned()
            .unwrap_or_default();
        links.sort_by_key(|link| link.sort_index);
        Ok(links)
    }

    async fn insert_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        let key = normalize_handle(handle);
        if !self.profiles.read().contains_key(&key) {
            return Err(BiolinkError::not_found(format!("Profile '{}' not found", key)));
        }
        let mut links = self.links.write();
        let entries = links.entry(key).or_default();
        if entries.iter().any(|existing| existing.id == link.id) {
            return Err(BiolinkError::conflict(format!(
                "Link '{}' already exists",
                link.id
            )));
        }
        entries.push(link.clone());
        Ok(())
    }

    async fn update_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        let mut links = self.links.write();
        let slot = links
            .get_mut(&normalize_handle(handle))
            .and_then(|entries| entries.iter_mut().find(|existing| existing.id == link.id))
            .ok_or_else(|| BiolinkError::not_found(format!("Link '{}' not found", link.id)))?;
        *slot = link.clone();
        Ok(())
    }

    async fn delete_link(&self, handle: &str, id: &str) -> Result<()> {
        if let Some(entries) = self.links.write().get_mut(&normalize_handle(handle)) {
            entries.retain(|link| link.id != id);
        }
        Ok(())
    }

    async fn replace_links(&self, handle: &str, links: &[LinkEntry]) -> Result<()> {
        self.links
            .write()
            .insert(normalize_handle(handle), links.to_vec());
        Ok(())
    }

    async fn count_profiles(&self) -> Result<u64> {
        Ok(self.profiles.read().len() as u64)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
