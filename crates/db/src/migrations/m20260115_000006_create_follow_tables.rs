//! Create restaurant_follow and user_follow tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantFollow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestaurantFollow::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantFollow::RestaurantId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestaurantFollow::Notifications)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RestaurantFollow::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RestaurantFollow::UserId)
                            .col(RestaurantFollow::RestaurantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_follow_user")
                            .from(RestaurantFollow::Table, RestaurantFollow::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_follow_restaurant")
                            .from(RestaurantFollow::Table, RestaurantFollow::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at) - followed feed orders by follow recency
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_follow_user_created")
                    .table(RestaurantFollow::Table)
                    .col(RestaurantFollow::UserId)
                    .col(RestaurantFollow::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: restaurant_id (follower counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_follow_restaurant_id")
                    .table(RestaurantFollow::Table)
                    .col(RestaurantFollow::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFollow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFollow::FollowerId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFollow::FolloweeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserFollow::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserFollow::FollowerId)
                            .col(UserFollow::FolloweeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_follow_follower")
                            .from(UserFollow::Table, UserFollow::FollowerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_follow_followee")
                            .from(UserFollow::Table, UserFollow::FolloweeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: followee_id (follower counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_follow_followee_id")
                    .table(UserFollow::Table)
                    .col(UserFollow::FolloweeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFollow::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RestaurantFollow::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RestaurantFollow {
    Table,
    UserId,
    RestaurantId,
    Notifications,
    CreatedAt,
}

#[derive(Iden)]
enum UserFollow {
    Table,
    FollowerId,
    FolloweeId,
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
