use super::Transactions;
use crate::database::entities::render_price;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .add_column(
                        ColumnDef::new(Transactions::PriceText)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // Backfill with the same rendering the application writes on insert
        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        let select = Query::select()
            .columns([Transactions::Id, Transactions::Price])
            .from(Transactions::Table)
            .to_owned();

        for row in db.query_all(backend.build(&select)).await? {
            let id: i32 = row.try_get("", "id")?;
            let price: f64 = row.try_get("", "price")?;
            let update = Query::update()
                .table(Transactions::Table)
                .value(Transactions::PriceText, render_price(price))
                .and_where(Expr::col(Transactions::Id).eq(id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Transactions::Table)
                    .drop_column(Transactions::PriceText)
                    .to_owned(),
            )
            .await
    }
}
