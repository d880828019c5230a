//! Migration to create daily_views table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyViews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DailyViews::ListingId).integer().not_null())
                    .col(ColumnDef::new(DailyViews::ViewDate).date().not_null())
                    .col(
                        ColumnDef::new(DailyViews::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(DailyViews::ListingId)
                            .col(DailyViews::ViewDate),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_views_listing")
                            .from(DailyViews::Table, DailyViews::ListingId)
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_views_date")
                    .table(DailyViews::Table)
                    .col(DailyViews::ViewDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyViews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DailyViews {
    Table,
    ListingId,
    ViewDate,
    ViewCount,
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
}
