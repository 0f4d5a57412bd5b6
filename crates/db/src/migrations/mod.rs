//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260115_000001_create_user_table;
mod m20260115_000002_create_restaurant_table;
mod m20260115_000003_create_dish_table;
mod m20260115_000004_create_review_table;
mod m20260115_000005_create_restaurant_owner_table;
mod m20260115_000006_create_follow_tables;
mod m20260115_000007_create_post_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_user_table::Migration),
            Box::new(m20260115_000002_create_restaurant_table::Migration),
            Box::new(m20260115_000003_create_dish_table::Migration),
            Box::new(m20260115_000004_create_review_table::Migration),
            Box::new(m20260115_000005_create_restaurant_owner_table::Migration),
            Box::new(m20260115_000006_create_follow_tables::Migration),
            Box::new(m20260115_000007_create_post_tables::Migration),
        ]
    }
}
