use crate::database::entities::{NewTransaction, TransactionRecord, transactions};
use crate::database::filter::{MonthFilter, PriceRange, TransactionFilter};
use crate::database::store::{CategoryTally, SaleTotals, TransactionStore};
use crate::database::{DatabaseError, DatabaseResult};
use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// SQLite caps bound parameters per statement; stay well under it
const INSERT_CHUNK_SIZE: usize = 100;

/// Escape character for LIKE patterns; backslash is quoted differently per backend
const LIKE_ESCAPE: char = '!';

const ASCII_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ASCII_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// Transactions DAO for database operations
#[derive(Clone)]
pub struct TransactionsDao {
    db: DatabaseConnection,
}

impl TransactionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active_model(record: &NewTransaction) -> transactions::ActiveModel {
        transactions::ActiveModel {
            id: ActiveValue::NotSet,
            product_title: Set(record.product_title.clone()),
            product_description: Set(record.product_description.clone()),
            price: Set(record.price),
            category: Set(record.category.clone()),
            sold: Set(record.sold),
            image: Set(record.image.clone()),
            date_of_sale: Set(record.date_of_sale),
            sale_year: Set(record.sale_year()),
            sale_month: Set(record.sale_month()),
            price_text: Set(record.price_text()),
        }
    }

    fn month_condition(month: Option<MonthFilter>) -> Condition {
        let mut condition = Condition::all();
        if let Some(month) = month {
            condition = condition.add(transactions::Column::SaleMonth.eq(month.month() as i32));
            if let Some(year) = month.year() {
                condition = condition.add(transactions::Column::SaleYear.eq(year));
            }
        }
        condition
    }

    /// ASCII-only lowercasing of a column, the SQL twin of
    /// [`fold_case`](crate::database::filter::fold_case)
    fn folded(&self, column: transactions::Column) -> SimpleExpr {
        match self.db.get_database_backend() {
            // PostgreSQL's LOWER() folds non-ASCII letters too
            DbBackend::Postgres => Func::cust(Alias::new("TRANSLATE"))
                .arg(Expr::col(column))
                .arg(Expr::val(ASCII_UPPER))
                .arg(Expr::val(ASCII_LOWER))
                .into(),
            _ => Func::lower(Expr::col(column)).into(),
        }
    }

    fn filter_condition(&self, filter: &TransactionFilter) -> Condition {
        let mut condition = Self::month_condition(filter.month);

        if let Some(needle) = &filter.search {
            let pattern = format!("%{}%", escape_like(needle));
            let mut any = Condition::any();
            for column in [
                transactions::Column::ProductTitle,
                transactions::Column::ProductDescription,
                transactions::Column::PriceText,
            ] {
                any = any.add(
                    Expr::expr(self.folded(column))
                        .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                );
            }
            condition = condition.add(any);
        }

        condition
    }
}

/// Make `%`, `_` and the escape character in user text match literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl TransactionStore for TransactionsDao {
    async fn insert_many(&self, records: &[NewTransaction]) -> DatabaseResult<u64> {
        let mut written = 0u64;
        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            transactions::Entity::insert_many(chunk.iter().map(Self::active_model))
                .exec(&self.db)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> DatabaseResult<Vec<TransactionRecord>> {
        let records = transactions::Entity::find()
            .filter(self.filter_condition(filter))
            .order_by_asc(transactions::Column::Id)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records)
    }

    async fn count(&self, filter: &TransactionFilter) -> DatabaseResult<u64> {
        transactions::Entity::find()
            .filter(self.filter_condition(filter))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    async fn sale_totals(&self, month: Option<MonthFilter>) -> DatabaseResult<SaleTotals> {
        #[derive(FromQueryResult)]
        struct PriceSum {
            total_amount: Option<f64>,
        }

        let sum = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Price.sum(), "total_amount")
            .filter(Self::month_condition(month))
            .into_model::<PriceSum>()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let sold_count = transactions::Entity::find()
            .filter(Self::month_condition(month))
            .filter(transactions::Column::Sold.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let not_sold_count = transactions::Entity::find()
            .filter(Self::month_condition(month))
            .filter(transactions::Column::Sold.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(SaleTotals {
            total_amount: sum.and_then(|s| s.total_amount).unwrap_or(0.0),
            sold_count,
            not_sold_count,
        })
    }

    async fn count_in_price_range(
        &self,
        month: Option<MonthFilter>,
        range: &PriceRange,
    ) -> DatabaseResult<u64> {
        let mut select = transactions::Entity::find().filter(Self::month_condition(month));

        if let Some(above) = range.above {
            select = select.filter(transactions::Column::Price.gt(above));
        }
        if let Some(up_to) = range.up_to {
            select = select.filter(transactions::Column::Price.lte(up_to));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    async fn count_by_category(
        &self,
        month: Option<MonthFilter>,
    ) -> DatabaseResult<Vec<CategoryTally>> {
        #[derive(FromQueryResult)]
        struct CategoryCount {
            category: Option<String>,
            item_count: i64,
        }

        let results: Vec<CategoryCount> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Category)
            .column_as(transactions::Column::Id.count(), "item_count")
            .filter(Self::month_condition(month))
            .group_by(transactions::Column::Category)
            .into_model()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(results
            .into_iter()
            .map(|r| CategoryTally {
                category: r.category,
                count: r.item_count.max(0) as u64,
            })
            .collect())
    }

    async fn ping(&self) -> DatabaseResult<()> {
        self.db
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }
}
