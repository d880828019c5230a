//! Migration to create listing_tags table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ListingTags::ListingId).integer().not_null())
                    .col(ColumnDef::new(ListingTags::Tag).string_len(100).not_null())
                    .col(
                        ColumnDef::new(ListingTags::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(ListingTags::ListingId)
                            .col(ListingTags::Tag),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_tags_listing")
                            .from(ListingTags::Table, ListingTags::ListingId)
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tag lookups filter by value first
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_tags_tag")
                    .table(ListingTags::Table)
                    .col(ListingTags::Tag)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingTags {
    Table,
    ListingId,
    Tag,
    Position,
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
}
