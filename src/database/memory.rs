use crate::database::entities::{NewTransaction, TransactionRecord};
use crate::database::filter::{MonthFilter, PriceRange, TransactionFilter};
use crate::database::store::{CategoryTally, SaleTotals, TransactionStore};
use crate::database::{DatabaseError, DatabaseResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Store operations that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Insert,
    Find,
    Count,
    SaleTotals,
    PriceRange,
    Categories,
    Ping,
}

/// In-memory transaction store for tests and local experiments
pub struct MemoryTransactionStore {
    records: RwLock<Vec<TransactionRecord>>,
    failing: RwLock<HashSet<StoreOperation>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Build a store pre-populated with `records`, ids assigned from 1
    pub fn with_records(records: Vec<NewTransaction>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_model(index as i32 + 1))
            .collect();

        Self {
            records: RwLock::new(records),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Make every subsequent call of `operation` return a database error
    pub async fn fail_on(&self, operation: StoreOperation) {
        self.failing.write().await.insert(operation);
    }

    pub async fn recover(&self, operation: StoreOperation) {
        self.failing.write().await.remove(&operation);
    }

    async fn check(&self, operation: StoreOperation) -> DatabaseResult<()> {
        if self.failing.read().await.contains(&operation) {
            return Err(DatabaseError::Database(format!(
                "simulated failure in {:?}",
                operation
            )));
        }
        Ok(())
    }

    async fn month_records(&self, month: Option<MonthFilter>) -> Vec<TransactionRecord> {
        let filter = TransactionFilter::for_month(month);
        self.records
            .read()
            .await
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn insert_many(&self, new_records: &[NewTransaction]) -> DatabaseResult<u64> {
        self.check(StoreOperation::Insert).await?;

        let mut records = self.records.write().await;
        let mut next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        for record in new_records {
            records.push(record.clone().into_model(next_id));
            next_id += 1;
        }
        Ok(new_records.len() as u64)
    }

    async fn find(
        &self,
        filter: &TransactionFilter,
        offset: u64,
        limit: u64,
    ) -> DatabaseResult<Vec<TransactionRecord>> {
        self.check(StoreOperation::Find).await?;

        let records = self.records.read().await;
        let mut matching: Vec<&TransactionRecord> =
            records.iter().filter(|record| filter.matches(record)).collect();
        matching.sort_by_key(|record| record.id);

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> DatabaseResult<u64> {
        self.check(StoreOperation::Count).await?;

        let records = self.records.read().await;
        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    async fn sale_totals(&self, month: Option<MonthFilter>) -> DatabaseResult<SaleTotals> {
        self.check(StoreOperation::SaleTotals).await?;

        let records = self.month_records(month).await;
        let sold_count = records.iter().filter(|r| r.sold).count() as u64;

        Ok(SaleTotals {
            total_amount: records.iter().map(|r| r.price).sum(),
            sold_count,
            not_sold_count: records.len() as u64 - sold_count,
        })
    }

    async fn count_in_price_range(
        &self,
        month: Option<MonthFilter>,
        range: &PriceRange,
    ) -> DatabaseResult<u64> {
        self.check(StoreOperation::PriceRange).await?;

        let records = self.month_records(month).await;
        Ok(records.iter().filter(|r| range.contains(r.price)).count() as u64)
    }

    async fn count_by_category(
        &self,
        month: Option<MonthFilter>,
    ) -> DatabaseResult<Vec<CategoryTally>> {
        self.check(StoreOperation::Categories).await?;

        let mut counts: HashMap<Option<String>, u64> = HashMap::new();
        for record in self.month_records(month).await {
            *counts.entry(record.category).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryTally { category, count })
            .collect())
    }

    async fn ping(&self) -> DatabaseResult<()> {
        self.check(StoreOperation::Ping).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::parse_sale_date;
    use crate::database::filter::price_ranges;

    fn sale(title: &str, price: f64, date: &str) -> NewTransaction {
        NewTransaction::new(title, price, parse_sale_date(date).unwrap())
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryTransactionStore::with_records(vec![sale("A", 1.0, "2022-03-01")]);
        let written = store
            .insert_many(&[
                sale("B", 2.0, "2022-03-02"),
                sale("C", 3.0, "2022-04-01"),
                sale("D", 4.0, "2022-04-02"),
            ])
            .await
            .unwrap();
        assert_eq!(written, 3);

        let all = store.find(&TransactionFilter::default(), 0, 10).await.unwrap();
        let ids: Vec<i32> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_aggregates_follow_month_filter() {
        let store = MemoryTransactionStore::with_records(vec![
            sale("A", 50.0, "2022-03-01").with_category("A"),
            sale("B", 150.0, "2022-03-15").with_category("B").unsold(),
            sale("C", 950.0, "2022-11-03"),
        ]);
        let march = Some(MonthFilter::MonthOfYear(3));

        let totals = store.sale_totals(march).await.unwrap();
        assert_eq!(totals.total_amount, 200.0);
        assert_eq!(totals.sold_count, 1);
        assert_eq!(totals.not_sold_count, 1);

        let ranges = price_ranges();
        assert_eq!(store.count_in_price_range(march, &ranges[0]).await.unwrap(), 1);
        assert_eq!(store.count_in_price_range(march, &ranges[9]).await.unwrap(), 0);
        assert_eq!(store.count_in_price_range(None, &ranges[9]).await.unwrap(), 1);

        let categories = store.count_by_category(None).await.unwrap();
        assert_eq!(categories.iter().map(|c| c.count).sum::<u64>(), 3);
    }

    #[tokio::test]
    async fn test_fail_on_and_recover() {
        let store = MemoryTransactionStore::new();
        store.fail_on(StoreOperation::SaleTotals).await;

        let err = store.sale_totals(None).await.unwrap_err();
        assert!(err.to_string().contains("SaleTotals"));
        // Other operations are unaffected
        assert!(store.count(&TransactionFilter::default()).await.is_ok());

        store.recover(StoreOperation::SaleTotals).await;
        assert!(store.sale_totals(None).await.is_ok());
    }
}
