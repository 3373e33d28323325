//! `SeaORM` entities for `SqliteStore`.

pub mod domain;
pub mod store;
