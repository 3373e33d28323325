use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub domain_type: String,
    pub status: String,
    pub dns_verified: i32,
    pub ssl_status: String,
    pub last_checked: Option<String>,
    pub in_use: i64,
    /// History events as a JSON array
    pub history: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
