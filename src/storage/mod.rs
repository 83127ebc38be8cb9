use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::errors::{BiolinkError, Result};

pub mod backend;
pub mod file;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use models::{
    AccentColor, DEFAULT_AVATAR_REF, Icon, IconGlyph, LinkEntry, ProfileMeta, ProfileRecord,
    normalize_handle,
};

/// Keyed store of profile and link rows.
///
/// Every method is one logical call; callers never assume a transaction
/// spanning several of them. Handles may be passed in any case.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_profile(&self, handle: &str) -> Result<Option<ProfileMeta>>;

    async fn insert_profile(&self, meta: &ProfileMeta) -> Result<()>;

    /// Fails with `NotFound` when the profile does not exist.
    async fn update_profile(&self, meta: &ProfileMeta) -> Result<()>;

    /// Links of one profile, ascending `sort_index`.
    async fn list_links(&self, handle: &str) -> Result<Vec<LinkEntry>>;

    async fn insert_link(&self, handle: &str, link: &LinkEntry) -> Result<()>;

    /// Fails with `NotFound` when the link does not exist.
    async fn update_link(&self, handle: &str, link: &LinkEntry) -> Result<()>;

    /// Absent ids are not an error.
    async fn delete_link(&self, handle: &str, id: &str) -> Result<()>;

    /// Swap the whole link list of a profile.
    async fn replace_links(&self, handle: &str, links: &[LinkEntry]) -> Result<()> {
        for existing in self.list_links(handle).await? {
            self.delete_link(handle, &existing.id).await?;
        }
        for link in links {
            self.insert_link(handle, link).await?;
        }
        Ok(())
    }

    async fn count_profiles(&self) -> Result<u64>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<dyn RecordStore>> {
        let config = crate::config::get_config();

        let store: Arc<dyn RecordStore> = match config.storage.backend.as_str() {
            "file" => Arc::new(FileStorage::open(&config.storage.file_path)?),
            "memory" => Arc::new(MemoryStorage::new()),
            "database" => {
                let database_url = &config.database.database_url;
                // 从 URL 自动推断数据库类型
                let backend_type = backend::infer_backend_from_url(database_url)?;
                Arc::new(SeaOrmStorage::new(database_url, &backend_type).await?)
            }
            explicit @ ("sqlite" | "mysql" | "postgres") => {
                Arc::new(SeaOrmStorage::new(&config.database.database_url, explicit).await?)
            }
            other => {
                return Err(BiolinkError::config(format!(
                    "Unknown storage backend '{}'. Supported: database, sqlite, mysql, postgres, file, memory",
                    other
                )));
            }
        };

        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
