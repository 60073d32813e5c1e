use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Barcode length fits EAN-8/EAN-13/UPC-A/UPC-E codes with headroom.
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Barcode)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Products::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::Title).text().not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::Image).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(8, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::CategoryId).uuid().not_null())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(
                                super::m20240601_000002_create_categories_table::Categories::Table,
                                super::m20240601_000002_create_categories_table::Categories::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Barcode,
    Slug,
    Title,
    Description,
    Image,
    Price,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}
