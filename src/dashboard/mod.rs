//! Query and aggregation services behind the dashboard endpoints.
//!
//! Every operation reads through the injected [`TransactionStore`]; the
//! combined view calls the other four in-process and fails as a whole when
//! any of them fails.

use crate::database::TransactionStore;
use crate::database::filter::{MonthFilter, TransactionFilter, price_ranges};
use crate::error::AppError;
use crate::server::config::DashboardConfig;
use futures_util::future::try_join_all;
use std::sync::Arc;

pub mod types;

#[cfg(test)]
mod tests;

pub use types::*;

/// Log form of a month restriction
fn month_label(month: Option<MonthFilter>) -> String {
    month.map_or_else(|| "any".to_string(), |month| month.to_string())
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn TransactionStore>,
    config: DashboardConfig,
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("config", &self.config)
            .finish()
    }
}

impl DashboardService {
    pub fn new(store: Arc<dyn TransactionStore>, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    /// Validate raw paging parameters into a page number and page size
    fn page_params(&self, page: Option<i64>, per_page: Option<i64>) -> Result<(u64, u64), AppError> {
        let page = match page {
            None => 1,
            Some(page) if page < 1 => {
                return Err(AppError::BadRequest(format!(
                    "page must be at least 1, got {}",
                    page
                )));
            }
            Some(page) => page as u64,
        };

        let per_page = match per_page {
            None => self.config.default_per_page,
            Some(per_page) if per_page < 1 => {
                return Err(AppError::BadRequest(format!(
                    "perPage must be at least 1, got {}",
                    per_page
                )));
            }
            Some(per_page) => per_page as u64,
        };

        Ok((page, per_page.min(self.config.max_per_page).max(1)))
    }

    /// One page of matching transactions, ordered by id
    pub async fn transactions(
        &self,
        filter: TransactionFilter,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<TransactionsPage, AppError> {
        let (page, per_page) = self.page_params(page, per_page)?;

        let total_records = self.store.count(&filter).await?;
        let pagination = Pagination::new(page, per_page, total_records);

        let transactions = if pagination.offset() < total_records {
            self.store
                .find(&filter, pagination.offset(), per_page)
                .await?
        } else {
            Vec::new()
        };

        tracing::debug!(
            month = %month_label(filter.month),
            search = ?filter.search,
            page,
            per_page,
            total_records,
            "Listed transactions"
        );

        Ok(TransactionsPage {
            transactions,
            pagination,
        })
    }

    pub async fn statistics(&self, month: Option<MonthFilter>) -> Result<Statistics, AppError> {
        let totals = self.store.sale_totals(month).await?;

        Ok(Statistics {
            total_sale_amount: totals.total_amount,
            total_sold_items: totals.sold_count,
            total_not_sold_items: totals.not_sold_count,
        })
    }

    /// Item counts for the fixed price buckets, zero-count buckets included
    pub async fn bar_chart(
        &self,
        month: Option<MonthFilter>,
    ) -> Result<Vec<PriceRangeCount>, AppError> {
        let ranges = price_ranges();
        let counts = try_join_all(
            ranges
                .iter()
                .map(|range| self.store.count_in_price_range(month, range)),
        )
        .await?;

        Ok(ranges
            .into_iter()
            .zip(counts)
            .map(|(range, item_count)| PriceRangeCount {
                price_range: range.label,
                item_count,
            })
            .collect())
    }

    /// Item counts per category, largest first
    pub async fn pie_chart(&self, month: Option<MonthFilter>) -> Result<Vec<CategoryCount>, AppError> {
        let mut tallies = self.store.count_by_category(month).await?;
        tallies.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(tallies
            .into_iter()
            .map(|tally| CategoryCount {
                category: tally.category,
                item_count: tally.count,
            })
            .collect())
    }

    /// First page of the month, statistics and both charts in one payload
    pub async fn combined(&self, month: Option<MonthFilter>) -> Result<CombinedData, AppError> {
        tracing::debug!(month = %month_label(month), "Building combined dashboard data");

        let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
            self.transactions(TransactionFilter::for_month(month), None, None),
            self.statistics(month),
            self.bar_chart(month),
            self.pie_chart(month),
        )?;

        Ok(CombinedData {
            transactions,
            statistics,
            bar_chart,
            pie_chart,
        })
    }
}
