//! Migration to create listings table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Listings::Comment).string_len(255).null())
                    .col(ColumnDef::new(Listings::MainGenre).string_len(100).not_null())
                    .col(ColumnDef::new(Listings::SubGenre).string_len(100).null())
                    .col(ColumnDef::new(Listings::Other).string_len(255).null())
                    .col(ColumnDef::new(Listings::Description).text().null())
                    .col(ColumnDef::new(Listings::AdmissionFee).integer().null())
                    .col(ColumnDef::new(Listings::AnnualFee).integer().null())
                    .col(ColumnDef::new(Listings::Location).string_len(255).null())
                    .col(ColumnDef::new(Listings::Instagram).string_len(255).null())
                    .col(ColumnDef::new(Listings::NameSearch).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Listings::GenreSearch)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Listings::Slider1).integer().not_null().default(0))
                    .col(ColumnDef::new(Listings::Slider2).integer().not_null().default(0))
                    .col(ColumnDef::new(Listings::Slider3).integer().not_null().default(0))
                    .col(ColumnDef::new(Listings::Slider4).integer().not_null().default(0))
                    .col(ColumnDef::new(Listings::SecretHash).string_len(255).not_null())
                    .col(ColumnDef::new(Listings::CreatedBy).string().null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_created_by")
                            .from(Listings::Table, Listings::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_main_genre")
                    .table(Listings::Table)
                    .col(Listings::MainGenre)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    Name,
    Comment,
    MainGenre,
    SubGenre,
    Other,
    Description,
    AdmissionFee,
    AnnualFee,
    Location,
    Instagram,
    NameSearch,
    GenreSearch,
    Slider1,
    Slider2,
    Slider3,
    Slider4,
    SecretHash,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
