use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Line items carry a denormalized copy of the product fields at
        // purchase time, so the barcode is deliberately not unique here.
        manager
            .create_table(
                Table::create()
                    .table(PurchaseItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::Barcode)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseItems::Title).text().not_null())
                    .col(
                        ColumnDef::new(PurchaseItems::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::Image)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::Price)
                            .decimal_len(8, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseItems::CategoryId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseItems::Quantity)
                            .decimal_len(8, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::TotalPrice)
                            .decimal_len(8, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseItems::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_items_purchase_order_id")
                            .from(PurchaseItems::Table, PurchaseItems::PurchaseOrderId)
                            .to(
                                super::m20240601_000005_create_purchase_orders_table::PurchaseOrders::Table,
                                super::m20240601_000005_create_purchase_orders_table::PurchaseOrders::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_items_category_id")
                            .from(PurchaseItems::Table, PurchaseItems::CategoryId)
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
                    .name("idx_purchase_items_purchase_order_id")
                    .table(PurchaseItems::Table)
                    .col(PurchaseItems::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PurchaseItems {
    Table,
    Id,
    PurchaseOrderId,
    Barcode,
    Title,
    Description,
    Image,
    Price,
    CategoryId,
    Quantity,
    TotalPrice,
    CreatedAt,
}
