use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::Timestamp)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::UserId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Cart).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_user_id")
                            .from(PurchaseOrders::Table, PurchaseOrders::UserId)
                            .to(
                                super::m20240601_000001_create_users_table::Users::Table,
                                super::m20240601_000001_create_users_table::Users::Id,
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
                    .name("idx_purchase_orders_user_id")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PurchaseOrders {
    Table,
    Id,
    Timestamp,
    UserId,
    Cart,
}
