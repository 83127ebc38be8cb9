//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{BiolinkError, Result};
use crate::storage::RecordStore;
use crate::storage::models::{LinkEntry, ProfileMeta};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{
    link_to_active_model, meta_to_active_model, model_to_link, model_to_meta,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(BiolinkError::config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based record storage
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(BiolinkError::config("database_url is not set".to_string()));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RecordStore for SeaOrmStorage {
    async fn find_profile(&self, handle: &str) -> Result<Option<ProfileMeta>> {
        self.get_profile(handle).await
    }

    async fn insert_profile(&self, meta: &ProfileMeta) -> Result<()> {
        self.create_profile(meta).await
    }

    async fn update_profile(&self, meta: &ProfileMeta) -> Result<()> {
        self.save_profile(meta).await
    }

    async fn list_links(&self, handle: &str) -> Result<Vec<LinkEntry>> {
        self.load_links(handle).await
    }

    async fn insert_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        self.create_link(handle, link).await
    }

    async fn update_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        self.save_link(handle, link).await
    }

    async fn delete_link(&self, handle: &str, id: &str) -> Result<()> {
        self.remove_link(handle, id).await
    }

    async fn replace_links(&self, handle: &str, links: &[LinkEntry]) -> Result<()> {
        self.swap_links(handle, links).await
    }

    async fn count_profiles(&self) -> Result<u64> {
        self.profile_count().await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
