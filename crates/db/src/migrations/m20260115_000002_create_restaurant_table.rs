//! Create restaurant table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Restaurant::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Restaurant::Cuisine).string_len(50))
                    .col(ColumnDef::new(Restaurant::Location).string_len(100))
                    .col(ColumnDef::new(Restaurant::Address).text())
                    .col(ColumnDef::new(Restaurant::Description).text())
                    .col(
                        ColumnDef::new(Restaurant::PriceRange)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(ColumnDef::new(Restaurant::OwnerId).string_len(32))
                    .col(
                        ColumnDef::new(Restaurant::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Restaurant::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Restaurant::ContactPhone).string_len(20))
                    .col(ColumnDef::new(Restaurant::ContactEmail).string_len(100))
                    .col(ColumnDef::new(Restaurant::Website).string_len(200))
                    .col(ColumnDef::new(Restaurant::OpeningHours).json())
                    .col(ColumnDef::new(Restaurant::SocialLinks).json())
                    .col(ColumnDef::new(Restaurant::ImageUrl).string_len(500))
                    .col(
                        ColumnDef::new(Restaurant::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Restaurant::UpdatedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_owner")
                            .from(Restaurant::Table, Restaurant::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: cuisine (feed recommendation matching)
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_cuisine")
                    .table(Restaurant::Table)
                    .col(Restaurant::Cuisine)
                    .to_owned(),
            )
            .await?;

        // Index: status (public listings filter on approved)
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_status")
                    .table(Restaurant::Table)
                    .col(Restaurant::Status)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_owner_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
    Name,
    Cuisine,
    Location,
    Address,
    Description,
    PriceRange,
    OwnerId,
    Status,
    IsActive,
    ContactPhone,
    ContactEmail,
    Website,
    OpeningHours,
    SocialLinks,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
