//! JSON file backend
//!
//! The whole store is one key-value document, handle -> profile record.
//! It is read once at open and rewritten after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{error, info};

use super::RecordStore;
use super::models::{LinkEntry, ProfileMeta, ProfileRecord, normalize_handle};
use crate::errors::{BiolinkError, Result};

type Document = BTreeMap<String, ProfileRecord>;

pub struct FileStorage {
    file_path: PathBuf,
    records: RwLock<Document>,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        let records = Self::load_from_file(&file_path)?;
        info!(
            "FileStorage 初始化完成，已加载 {} 个 profile ({})",
            records.len(),
            file_path.display()
        );

        Ok(FileStorage {
            file_path,
            records: RwLock::new(records),
        })
    }

    fn load_from_file(path: &Path) -> Result<Document> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("存储文件不存在，创建空的存储: {}", path.display());
                Self::write_document(path, &Document::new())?;
                return Ok(Document::new());
            }
            Err(e) => {
                error!("读取存储文件失败: {}", e);
                return Err(BiolinkError::file_operation(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str::<Document>(&content).map_err(|e| {
            error!("解析存储文件失败: {}", e);
            BiolinkError::serialization(format!("Cannot parse {}: {}", path.display(), e))
        })
    }

    fn write_document(path: &Path, records: &Document) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Apply `change` to a copy of the document under the write lock.
    /// The copy replaces the cached document only once it is on disk.
    fn mutate<T>(&self, change: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let mut records = self.records.write();
        let mut draft = records.clone();
        let value = change(&mut draft)?;
        Self::write_document(&self.file_path, &draft).map_err(|e| {
            error!("写入存储文件失败: {}", e);
            BiolinkError::backend_unavailable(format!("Cannot persist file store: {}", e))
        })?;
        *records = draft;
        Ok(value)
    }

    fn profile_mut<'a>(records: &'a mut Document, handle: &str) -> Result<&'a mut ProfileRecord> {
        records
            .get_mut(&normalize_handle(handle))
            .ok_or_else(|| BiolinkError::not_found(format!("Profile '{}' not found", handle)))
    }
}

#[async_trait]
impl RecordStore for FileStorage {
    async fn find_profile(&self, handle: &str) -> Result<Option<ProfileMeta>> {
        let records = self.records.read();
        Ok(records
            .get(&normalize_handle(handle))
            .map(|record| record.meta.clone()))
    }

    async fn insert_profile(&self, meta: &ProfileMeta) -> Result<()> {
        let key = normalize_handle(&meta.handle);
        self.mutate(|records| {
            if records.contains_key(&key) {
                return Err(BiolinkError::conflict(format!(
                    "Profile '{}' already exists",
                    key
                )));
            }
            let mut meta = meta.clone();
            meta.handle = key.clone();
            records.insert(key, ProfileRecord::new(meta, Vec::new()));
            Ok(())
        })
    }

    async fn update_profile(&self, meta: &ProfileMeta) -> Result<()> {
        self.mutate(|records| {
            let record = Self::profile_mut(records, &meta.handle)?;
            let handle = record.meta.handle.clone();
            record.meta = meta.clone();
            record.meta.handle = handle;
            Ok(())
        })
    }

    async fn list_links(&self, handle: &str) -> Result<Vec<LinkEntry>> {
        let records = self.records.read();
        let mut links = records
            .get(&normalize_handle(handle))
            .map(|record| record.links.clone())
            .unwrap_or_default();
        links.sort_by_key(|link| link.sort_index);
        Ok(links)
    }

    async fn insert_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        self.mutate(|records| {
            let record = Self::profile_mut(records, handle)?;
            if record.position_of(&link.id).is_some() {
                return Err(BiolinkError::conflict(format!(
                    "Link '{}' already exists",
                    link.id
                )));
            }
            record.links.push(link.clone());
            Ok(())
        })
    }

    async fn update_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        self.mutate(|records| {
            let record = Self::profile_mut(records, handle)?;
            let position = record
                .position_of(&link.id)
                .ok_or_else(|| BiolinkError::not_found(format!("Link '{}' not found", link.id)))?;
            record.links[position] = link.clone();
            Ok(())
        })
    }

    async fn delete_link(&self, handle: &str, id: &str) -> Result<()> {
        self.mutate(|records| {
            if let Some(record) = records.get_mut(&normalize_handle(handle)) {
                record.links.retain(|link| link.id != id);
            }
            Ok(())
        })
    }

    async fn replace_links(&self, handle: &str, links: &[LinkEntry]) -> Result<()> {
        self.mutate(|records| {
            let record = Self::profile_mut(records, handle)?;
            record.links = links.to_vec();
            Ok(())
        })
    }

    async fn count_profiles(&self) -> Result<u64> {
        Ok(self.records.read().len() as u64)
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}
