//! `DomainRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use voltz_checkout_core::error::{CoreError, CoreResult};
use voltz_checkout_core::traits::DomainRepository;
use voltz_checkout_core::types::{Domain, DomainHistory, DomainType};

use super::entity::domain;
use super::{parse_timestamp, SqliteStore};

/// Parse a snake_case enum column through its serde representation
fn parse_enum<T: serde::de::DeserializeOwned>(field: &str, value: String) -> CoreResult<T> {
    serde_json::from_value(serde_json::Value::String(value))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}

impl domain::Model {
    /// Convert a `SeaORM` row model into a `Domain`.
    fn into_domain(self) -> CoreResult<Domain> {
        let domain_type = DomainType::parse(&self.domain_type).ok_or_else(|| {
            CoreError::SerializationError(format!("Invalid domain type: {}", self.domain_type))
        })?;
        let last_checked = self
            .last_checked
            .as_deref()
            .map(|s| parse_timestamp("last_checked", s))
            .transpose()?;
        let in_use = u32::try_from(self.in_use)
            .map_err(|e| CoreError::SerializationError(format!("Invalid in_use: {e}")))?;
        let history: DomainHistory = serde_json::from_str(&self.history)
            .map_err(|e| CoreError::SerializationError(format!("Invalid history JSON: {e}")))?;

        Ok(Domain {
            id: self.id,
            store_id: self.store_id,
            name: self.name,
            domain_type,
            status: parse_enum("status", self.status)?,
            dns_verified: self.dns_verified != 0,
            ssl_status: parse_enum("ssl_status", self.ssl_status)?,
            last_checked,
            in_use,
            history,
        })
    }
}

/// Convert a `Domain` into a `SeaORM` active model. `seq` is left to the database.
fn domain_to_active_model(d: &Domain) -> CoreResult<domain::ActiveModel> {
    let history = serde_json::to_string(&d.history)
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

    Ok(domain::ActiveModel {
        seq: NotSet,
        id: Set(d.id.clone()),
        store_id: Set(d.store_id.clone()),
        name: Set(d.name.clone()),
        domain_type: Set(d.domain_type.as_str().to_string()),
        status: Set(d.status.as_str().to_string()),
        dns_verified: Set(i32::from(d.dns_verified)),
        ssl_status: Set(d.ssl_status.as_str().to_string()),
        last_checked: Set(d.last_checked.map(|dt| dt.to_rfc3339())),
        in_use: Set(i64::from(d.in_use)),
        history: Set(history),
    })
}

#[async_trait]
impl DomainRepository for SqliteStore {
    async fn find_by_store(&self, store_id: &str) -> CoreResult<Vec<Domain>> {
        let rows = domain::Entity::find()
            .filter(domain::Column::StoreId.eq(store_id))
            .order_by_asc(domain::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domains: {e}")))?;

        rows.into_iter().map(domain::Model::into_domain).collect()
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        let row = domain::Entity::find()
            .filter(domain::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query domain: {e}")))?;

        row.map(domain::Model::into_domain).transpose()
    }

    async fn insert(&self, d: &Domain) -> CoreResult<()> {
        domain::Entity::insert(domain_to_active_model(d)?)
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert domain: {e}")))?;
        Ok(())
    }

    async fn update(&self, d: &Domain) -> CoreResult<()> {
        let result = domain::Entity::update_many()
            .set(domain_to_active_model(d)?)
            .filter(domain::Column::Id.eq(&d.id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update domain: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CoreError::DomainNotFound(d.id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        let result = domain::Entity::delete_many()
            .filter(domain::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete domain: {e}")))?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_store(&self, store_id: &str) -> CoreResult<()> {
        domain::Entity::delete_many()
            .filter(domain::Column::StoreId.eq(store_id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete domains: {e}")))?;
        Ok(())
    }
}
