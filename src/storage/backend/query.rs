//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::error;

use super::{SeaOrmStorage, retry};
use crate::errors::{BiolinkError, Result};
use crate::storage::models::{LinkEntry, ProfileMeta, normalize_handle};

use migration::entities::{bio_link, bio_profile};

use super::converters::{model_to_link, model_to_meta};

impl SeaOrmStorage {
    pub async fn get_profile(&self, handle: &str) -> Result<Option<ProfileMeta>> {
        let db = &self.db;
        let key = normalize_handle(handle);

        let result = retry::with_retry(
            &format!("get_profile({})", key),
            self.retry_config,
            || async { bio_profile::Entity::find_by_id(key.clone()).one(db).await },
        )
        .await;

        match result {
            Ok(model) => Ok(model.map(model_to_meta)),
            Err(e) => {
                error!("Failed to load profile '{}' after retries: {}", key, e);
                Err(BiolinkError::backend_unavailable(format!(
                    "Failed to load profile '{}': {}",
                    key, e
                )))
            }
        }
    }

    /// 按 sort_order 升序加载某个 profile 的全部链接
    pub async fn load_links(&self, handle: &str) -> Result<Vec<LinkEntry>> {
        let db = &self.db;
        let key = normalize_handle(handle);

        let models = retry::with_retry(
            &format!("load_links({})", key),
            self.retry_config,
            || async {
                bio_link::Entity::find()
                    .filter(bio_link::Column::ProfileHandle.eq(key.clone()))
                    .order_by_asc(bio_link::Column::SortOrder)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            error!("Failed to load links of '{}' after retries: {}", key, e);
            BiolinkError::backend_unavailable(format!("Failed to load links: {}", e))
        })?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn profile_count(&self) -> Result<u64> {
        bio_profile::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| BiolinkError::backend_unavailable(format!("Failed to count profiles: {}", e)))
    }
}
