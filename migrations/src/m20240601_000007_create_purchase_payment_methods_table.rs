use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Payment methods are protected while referenced: Restrict, not Cascade.
        manager
            .create_table(
                Table::create()
                    .table(PurchasePaymentMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchasePaymentMethods::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchasePaymentMethods::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasePaymentMethods::PaymentMethodId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasePaymentMethods::Value)
                            .decimal_len(8, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasePaymentMethods::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_payment_methods_purchase_order_id")
                            .from(
                                PurchasePaymentMethods::Table,
                                PurchasePaymentMethods::PurchaseOrderId,
                            )
                            .to(
                                super::m20240601_000005_create_purchase_orders_table::PurchaseOrders::Table,
                                super::m20240601_000005_create_purchase_orders_table::PurchaseOrders::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_payment_methods_payment_method_id")
                            .from(
                                PurchasePaymentMethods::Table,
                                PurchasePaymentMethods::PaymentMethodId,
                            )
                            .to(
                                super::m20240601_000004_create_payment_methods_table::PaymentMethods::Table,
                                super::m20240601_000004_create_payment_methods_table::PaymentMethods::Id,
                            )
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_payment_methods_purchase_order_id")
                    .table(PurchasePaymentMethods::Table)
                    .col(PurchasePaymentMethods::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PurchasePaymentMethods::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum PurchasePaymentMethods {
    Table,
    Id,
    PurchaseOrderId,
    PaymentMethodId,
    Value,
    CreatedAt,
}
