//! Create restaurant_owner table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantOwner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantOwner::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantOwner::RestaurantId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantOwner::Role)
                            .string_len(16)
                            .not_null()
                            .default("owner"),
                    )
                    .col(
                        ColumnDef::new(RestaurantOwner::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RestaurantOwner::UserId)
                            .col(RestaurantOwner::RestaurantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_owner_user")
                            .from(RestaurantOwner::Table, RestaurantOwner::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_owner_restaurant")
                            .from(RestaurantOwner::Table, RestaurantOwner::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: restaurant_id (list a restaurant's staff)
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_owner_restaurant_id")
                    .table(RestaurantOwner::Table)
                    .col(RestaurantOwner::RestaurantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantOwner::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RestaurantOwner {
    Table,
    UserId,
    RestaurantId,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
}
