//! Migration to create listing_photos table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingPhotos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ListingPhotos::ListingId).integer().not_null())
                    .col(ColumnDef::new(ListingPhotos::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(ListingPhotos::Position).integer().not_null())
                    .col(ColumnDef::new(ListingPhotos::FileName).string_len(255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_photos_listing")
                            .from(ListingPhotos::Table, ListingPhotos::ListingId)
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_photos_listing")
                    .table(ListingPhotos::Table)
                    .col(ListingPhotos::ListingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingPhotos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingPhotos {
    Table,
    Id,
    ListingId,
    Kind,
    Position,
    FileName,
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
}
