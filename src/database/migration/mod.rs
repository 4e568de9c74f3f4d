use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250301_000001_create_transactions_table;
mod m20250315_000001_add_sale_status_columns;
mod m20250401_000001_add_price_text_column;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_transactions_table::Migration),
            Box::new(m20250315_000001_add_sale_status_columns::Migration),
            Box::new(m20250401_000001_add_price_text_column::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Transactions {
    Table,
    Id,
    ProductTitle,
    ProductDescription,
    Price,
    Category,
    Sold,
    Image,
    DateOfSale,
    SaleYear,
    SaleMonth,
    PriceText,
}
