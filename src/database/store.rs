use crate::database::DatabaseResult;
use crate::database::entities::{NewTransaction, TransactionRecord};
use crate::database::filter::{MonthFilter, PriceRange, TransactionFilter};
use async_trait::async_trait;

/// Aggregate totals over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaleTotals {
    pub total_amount: f64,
    pub sold_count: u64,
    pub not_sold_count: u64,
}

/// Number of transactions sharing one category value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    pub category: Option<String>,
    pub count: u64,
}

/// Read/write access to the sale records.
///
/// Handed explicitly to the services that need it so tests can swap in
/// [`MemoryTransactionStore`](crate::database::memory::MemoryTransactionStore).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Store records in bulk, returns how many were written
    async fn insert_many(&self, records: &[NewTransaction]) -> DatabaseResult<u64>;

    /// Matching records ordered by id
    async fn find(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> DatabaseResult<Vec<TransactionRecord>>;

    /// Number of matching records
    async fn count(&self, filter: &TransactionFilter) -> DatabaseResult<u64>;

    /// Price sum and sold/unsold counts for a month
    async fn sale_totals(&self, month: Option<MonthFilter>) -> DatabaseResult<SaleTotals>;

    /// Number of records in the month whose price falls inside `range`
    async fn count_in_price_range(
        &self,
        month: Option<MonthFilter>,
        range: &PriceRange,
    ) -> DatabaseResult<u64>;

    /// Records in the month grouped by category, in no particular order
    async fn count_by_category(&self, month: Option<MonthFilter>)
    -> DatabaseResult<Vec<CategoryTally>>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> DatabaseResult<()>;
}
