use super::Transactions;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ProductTitle)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ProductDescription)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Price).double().not_null())
                    .col(ColumnDef::new(Transactions::Category).string().null())
                    .col(
                        ColumnDef::new(Transactions::DateOfSale)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::SaleYear).integer().not_null())
                    .col(
                        ColumnDef::new(Transactions::SaleMonth)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Month-of-year filters
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_sale_month")
                    .table(Transactions::Table)
                    .col(Transactions::SaleMonth)
                    .to_owned(),
            )
            .await?;

        // Year + month filters
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_sale_year_month")
                    .table(Transactions::Table)
                    .col(Transactions::SaleYear)
                    .col(Transactions::SaleMonth)
                    .to_owned(),
            )
            .await?;

        // Category grouping
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_category")
                    .table(Transactions::Table)
                    .col(Transactions::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
