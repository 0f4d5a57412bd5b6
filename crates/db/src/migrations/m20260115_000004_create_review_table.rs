//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Review::RestaurantId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Review::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::UserName).string_len(100).not_null())
                    .col(ColumnDef::new(Review::Rating).integer().not_null())
                    .col(ColumnDef::new(Review::Comment).text())
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Review::UpdatedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_restaurant")
                            .from(Review::Table, Review::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Review::Rating).between(1, 5))
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, restaurant_id) - one review per user per restaurant
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_restaurant")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .col(Review::RestaurantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: restaurant_id (rating aggregates)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_restaurant_id")
                    .table(Review::Table)
                    .col(Review::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (trending window scans)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_created_at")
                    .table(Review::Table)
                    .col(Review::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    RestaurantId,
    UserId,
    UserName,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
