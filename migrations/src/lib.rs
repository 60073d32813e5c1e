pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_table;
mod m20240601_000002_create_categories_table;
mod m20240601_000003_create_products_table;
mod m20240601_000004_create_payment_methods_table;
mod m20240601_000005_create_purchase_orders_table;
mod m20240601_000006_create_purchase_items_table;
mod m20240601_000007_create_purchase_payment_methods_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_table::Migration),
            Box::new(m20240601_000002_create_categories_table::Migration),
            Box::new(m20240601_000003_create_products_table::Migration),
            Box::new(m20240601_000004_create_payment_methods_table::Migration),
            Box::new(m20240601_000005_create_purchase_orders_table::Migration),
            Box::new(m20240601_000006_create_purchase_items_table::Migration),
            Box::new(m20240601_000007_create_purchase_payment_methods_table::Migration),
        ]
    }
}
