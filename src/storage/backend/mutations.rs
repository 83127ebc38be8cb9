//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, SqlErr, TransactionTrait};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{link_to_active_model, meta_to_active_model};
use super::retry;
use crate::errors::{BiolinkError, Result};
use crate::storage::models::{LinkEntry, ProfileMeta, normalize_handle};

use migration::entities::{bio_link, bio_profile};

/// 唯一约束冲突映射为 Conflict，其余视为后端不可用
fn insert_error(what: &str, key: &str, err: DbErr) -> BiolinkError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        BiolinkError::conflict(format!("{} '{}' already exists", what, key))
    } else {
        BiolinkError::backend_unavailable(format!("Failed to insert {}: {}", what, err))
    }
}

impl SeaOrmStorage {
    pub async fn create_profile(&self, meta: &ProfileMeta) -> Result<()> {
        let db = &self.db;
        let active_model = meta_to_active_model(meta);

        retry::with_retry(
            &format!("create_profile({})", meta.handle),
            self.retry_config,
            || {
                let am = active_model.clone();
                async move { bio_profile::Entity::insert(am).exec(db).await.map(|_| ()) }
            },
        )
        .await
        .map_err(|e| insert_error("Profile", &meta.handle, e))?;

        info!("Profile created: {}", meta.handle);
        Ok(())
    }

    pub async fn save_profile(&self, meta: &ProfileMeta) -> Result<()> {
        let db = &self.db;
        let key = normalize_handle(&meta.handle);
        let active_model = meta_to_active_model(meta);

        let result = retry::with_retry(
            &format!("save_profile({})", key),
            self.retry_config,
            || {
                let am = active_model.clone();
                let key = key.clone();
                async move {
                    bio_profile::Entity::update_many()
                        .set(am)
                        .filter(bio_profile::Column::Handle.eq(key))
                        .exec(db)
                        .await
                }
            },
        )
        .await
        .map_err(|e| BiolinkError::backend_unavailable(format!("Failed to save profile: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BiolinkError::not_found(format!(
                "Profile '{}' not found",
                key
            )));
        }

        debug!("Profile saved: {}", key);
        Ok(())
    }

    pub async fn create_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        let db = &self.db;
        let active_model = link_to_active_model(handle, link)?;

        retry::with_retry(
            &format!("create_link({})", link.id),
            self.retry_config,
            || {
                let am = active_model.clone();
                async move { bio_link::Entity::insert(am).exec(db).await.map(|_| ()) }
            },
        )
        .await
        .map_err(|e| insert_error("Link", &link.id, e))?;

        Ok(())
    }

    pub async fn save_link(&self, handle: &str, link: &LinkEntry) -> Result<()> {
        let db = &self.db;
        let key = normalize_handle(handle);
        let active_model = link_to_active_model(&key, link)?;

        let result = retry::with_retry(
            &format!("save_link({})", link.id),
            self.retry_config,
            || {
                let am = active_model.clone();
                let key = key.clone();
                let id = link.id.clone();
                async move {
                    bio_link::Entity::update_many()
                        .set(am)
                        .filter(bio_link::Column::Id.eq(id))
                        .filter(bio_link::Column::ProfileHandle.eq(key))
                        .exec(db)
                        .await
                }
            },
        )
        .await
        .map_err(|e| BiolinkError::backend_unavailable(format!("Failed to update link: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BiolinkError::not_found(format!(
                "Link '{}' not found",
                link.id
            )));
        }

        Ok(())
    }

    pub async fn remove_link(&self, handle: &str, id: &str) -> Result<()> {
        let db = &self.db;
        let key = normalize_handle(handle);

        let result = retry::with_retry(&format!("remove_link({})", id), self.retry_config, || {
            let key = key.clone();
            let id = id.to_string();
            async move {
                bio_link::Entity::delete_many()
                    .filter(bio_link::Column::Id.eq(id))
                    .filter(bio_link::Column::ProfileHandle.eq(key))
                    .exec(db)
                    .await
            }
        })
        .await
        .map_err(|e| BiolinkError::backend_unavailable(format!("Failed to delete link: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Link deleted: {}", id);
        }
        Ok(())
    }

    /// 在单个事务中替换某个 profile 的全部链接
    pub async fn swap_links(&self, handle: &str, links: &[LinkEntry]) -> Result<()> {
        let key = normalize_handle(handle);
        let active_models = links
            .iter()
            .map(|link| link_to_active_model(&key, link))
            .collect::<Result<Vec<bio_link::ActiveModel>>>()?;

        let txn = self.db.begin().await.map_err(|e| {
            BiolinkError::backend_unavailable(format!("Failed to begin transaction: {}", e))
        })?;

        bio_link::Entity::delete_many()
            .filter(bio_link::Column::ProfileHandle.eq(key.clone()))
            .exec(&txn)
            .await
            .map_err(|e| BiolinkError::backend_unavailable(format!("Failed to clear links: {}", e)))?;

        if !active_models.is_empty() {
            bio_link::Entity::insert_many(active_models)
                .exec(&txn)
                .await
                .map_err(|e| {
                    BiolinkError::backend_unavailable(format!("Failed to insert links: {}", e))
                })?;
        }

        txn.commit().await.map_err(|e| {
            BiolinkError::backend_unavailable(format!("Failed to commit transaction: {}", e))
        })?;

        info!("Replaced links of '{}' ({} entries)", key, links.len());
        Ok(())
    }
}
