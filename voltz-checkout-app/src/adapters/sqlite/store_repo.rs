//! `StoreRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use voltz_checkout_core::error::{CoreError, CoreResult};
use voltz_checkout_core::traits::StoreRepository;
use voltz_checkout_core::types::{ActivationStepId, Store, StoreActivationStatus};

use super::entity::store;
use super::{parse_timestamp, SqliteStore};

impl store::Model {
    /// Convert a `SeaORM` row model into a `Store`.
    fn into_store(self) -> CoreResult<Store> {
        let status: StoreActivationStatus = serde_json::from_str(&self.status)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store status: {e}")))?;

        Ok(Store {
            created_at: parse_timestamp("created_at", &self.created_at)?,
            id: self.id,
            name: self.name,
            is_demo: self.is_demo != 0,
            status,
        })
    }
}

fn status_json(status: &StoreActivationStatus) -> CoreResult<String> {
    serde_json::to_string(status).map_err(|e| CoreError::SerializationError(e.to_string()))
}

fn store_to_active_model(s: &Store) -> CoreResult<store::ActiveModel> {
    Ok(store::ActiveModel {
        seq: NotSet,
        id: Set(s.id.clone()),
        name: Set(s.name.clone()),
        is_demo: Set(i32::from(s.is_demo)),
        status: Set(status_json(&s.status)?),
        created_at: Set(s.created_at.to_rfc3339()),
    })
}

#[async_trait]
impl StoreRepository for SqliteStore {
    async fn find_all(&self) -> CoreResult<Vec<Store>> {
        let rows = store::Entity::find()
            .order_by_asc(store::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query stores: {e}")))?;

        let mut stores = rows
            .into_iter()
            .map(store::Model::into_store)
            .collect::<CoreResult<Vec<_>>>()?;
        // 同一时刻创建的保持插入顺序
        stores.sort_by_key(|s| s.created_at);
        Ok(stores)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Store>> {
        let row = store::Entity::find()
            .filter(store::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query store: {e}")))?;

        row.map(store::Model::into_store).transpose()
    }

    async fn save(&self, s: &Store) -> CoreResult<()> {
        let active_model = store_to_active_model(s)?;

        store::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(store::Column::Id)
                    .update_columns([
                        store::Column::Name,
                        store::Column::IsDemo,
                        store::Column::Status,
                        store::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save store: {e}")))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        store::Entity::delete_many()
            .filter(store::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete store: {e}")))?;
        Ok(())
    }

    async fn update_step(
        &self,
        id: &str,
        step: ActivationStepId,
        completed: bool,
    ) -> CoreResult<()> {
        let mut s = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::StoreNotFound(id.to_string()))?;
        s.status.set(step, completed);

        store::Entity::update_many()
            .col_expr(store::Column::Status, Expr::value(status_json(&s.status)?))
            .filter(store::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update store status: {e}")))?;

        Ok(())
    }
}
