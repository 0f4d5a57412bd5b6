//! Create dish table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dish::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dish::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dish::RestaurantId).string_len(32).not_null())
                    .col(ColumnDef::new(Dish::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Dish::Description).text())
                    .col(
                        ColumnDef::new(Dish::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Dish::Category).string_len(50))
                    .col(
                        ColumnDef::new(Dish::IsVegetarian)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Dish::IsSpicy)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Dish::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Dish::ImageUrl).string_len(500))
                    .col(ColumnDef::new(Dish::Calories).integer())
                    .col(ColumnDef::new(Dish::PreparationTime).integer())
                    .col(ColumnDef::new(Dish::Tags).json())
                    .col(
                        ColumnDef::new(Dish::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Dish::UpdatedAt).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dish_restaurant")
                            .from(Dish::Table, Dish::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: restaurant_id (menu listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_dish_restaurant_id")
                    .table(Dish::Table)
                    .col(Dish::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // Index: name (search + suggestions)
        manager
            .create_index(
                Index::create()
                    .name("idx_dish_name")
                    .table(Dish::Table)
                    .col(Dish::Name)
                    .to_owned(),
            )
            .await?;

        // Index: category (owner menu grouping)
        manager
            .create_index(
                Index::create()
                    .name("idx_dish_category")
                    .table(Dish::Table)
                    .col(Dish::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dish::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Dish {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    Price,
    Category,
    IsVegetarian,
    IsSpicy,
    IsAvailable,
    ImageUrl,
    Calories,
    PreparationTime,
    Tags,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
}
