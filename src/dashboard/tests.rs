use super::*;
use crate::database::entities::{NewTransaction, parse_sale_date};
use crate::database::{MemoryTransactionStore, StoreOperation};

fn sale(title: &str, price: f64, date: &str) -> NewTransaction {
    NewTransaction::new(title, price, parse_sale_date(date).unwrap())
}

fn march_records() -> Vec<NewTransaction> {
    vec![
        sale("Backpack", 50.0, "2022-03-01").with_category("A"),
        sale("Jacket", 150.0, "2022-03-15").with_category("B"),
    ]
}

fn service_with(records: Vec<NewTransaction>) -> (DashboardService, Arc<MemoryTransactionStore>) {
    let store = Arc::new(MemoryTransactionStore::with_records(records));
    let service = DashboardService::new(store.clone(), DashboardConfig::default());
    (service, store)
}

fn march() -> Option<MonthFilter> {
    Some(MonthFilter::MonthOfYear(3))
}

#[tokio::test]
async fn test_statistics_for_month() {
    let (service, _) = service_with(march_records());

    let stats = service.statistics(march()).await.unwrap();
    assert_eq!(
        stats,
        Statistics {
            total_sale_amount: 200.0,
            total_sold_items: 2,
            total_not_sold_items: 0,
        }
    );
}

#[tokio::test]
async fn test_statistics_counts_unsold_items() {
    let mut records = march_records();
    records.push(sale("Ring", 20.0, "2022-03-20").unsold());
    let (service, _) = service_with(records);

    let stats = service.statistics(march()).await.unwrap();
    assert_eq!(stats.total_sale_amount, 220.0);
    assert_eq!(stats.total_sold_items, 2);
    assert_eq!(stats.total_not_sold_items, 1);
}

#[tokio::test]
async fn test_statistics_with_no_matches() {
    let (service, _) = service_with(march_records());

    let stats = service
        .statistics(Some(MonthFilter::MonthOfYear(7)))
        .await
        .unwrap();
    assert_eq!(stats.total_sale_amount, 0.0);
    assert_eq!(stats.total_sold_items, 0);
    assert_eq!(stats.total_not_sold_items, 0);
}

#[tokio::test]
async fn test_bar_chart_buckets() {
    let (service, _) = service_with(march_records());

    let bars = service.bar_chart(march()).await.unwrap();
    assert_eq!(bars.len(), 10);
    assert_eq!(bars[0].price_range, "0 - 100");
    assert_eq!(bars[0].item_count, 1);
    assert_eq!(bars[1].price_range, "101 - 200");
    assert_eq!(bars[1].item_count, 1);
    assert!(bars[2..].iter().all(|bar| bar.item_count == 0));
    assert_eq!(bars[9].price_range, "901 - above");
}

#[tokio::test]
async fn test_bar_chart_counts_sum_to_month_total() {
    let (service, _) = service_with(vec![
        sale("A", 0.0, "2022-03-01"),
        sale("B", 100.0, "2022-03-02"),
        sale("C", 100.5, "2022-03-03"),
        sale("D", 900.0, "2022-03-04"),
        sale("E", 12000.0, "2022-03-05"),
        sale("F", 300.0, "2022-04-01"),
    ]);

    let bars = service.bar_chart(march()).await.unwrap();
    assert_eq!(bars.iter().map(|b| b.item_count).sum::<u64>(), 5);
    assert_eq!(bars[0].item_count, 2);
    assert_eq!(bars[1].item_count, 1);
    assert_eq!(bars[8].item_count, 1);
    assert_eq!(bars[9].item_count, 1);
}

#[tokio::test]
async fn test_pie_chart_ordering() {
    let (service, _) = service_with(vec![
        sale("A", 1.0, "2022-03-01").with_category("electronics"),
        sale("B", 1.0, "2022-03-02").with_category("clothing"),
        sale("C", 1.0, "2022-03-03").with_category("electronics"),
        sale("D", 1.0, "2022-03-04"),
        sale("E", 1.0, "2022-03-05").with_category("books"),
        sale("F", 1.0, "2022-05-05").with_category("books"),
    ]);

    let slices = service.pie_chart(march()).await.unwrap();
    let order: Vec<(Option<&str>, u64)> = slices
        .iter()
        .map(|s| (s.category.as_deref(), s.item_count))
        .collect();
    assert_eq!(
        order,
        vec![
            (Some("electronics"), 2),
            (None, 1),
            (Some("books"), 1),
            (Some("clothing"), 1),
        ]
    );
    assert_eq!(slices.iter().map(|s| s.item_count).sum::<u64>(), 5);
}

#[tokio::test]
async fn test_transactions_pagination() {
    let (service, _) = service_with(march_records());

    let first = service
        .transactions(TransactionFilter::for_month(march()), Some(1), Some(1))
        .await
        .unwrap();
    assert_eq!(first.transactions.len(), 1);
    assert_eq!(first.transactions[0].product_title, "Backpack");
    assert_eq!(first.pagination, Pagination::new(1, 1, 2));
    assert_eq!(first.pagination.total_pages, 2);

    let second = service
        .transactions(TransactionFilter::for_month(march()), Some(2), Some(1))
        .await
        .unwrap();
    assert_eq!(second.transactions[0].product_title, "Jacket");

    let past_end = service
        .transactions(TransactionFilter::for_month(march()), Some(3), Some(1))
        .await
        .unwrap();
    assert!(past_end.transactions.is_empty());
    assert_eq!(past_end.pagination.total_records, 2);
}

#[tokio::test]
async fn test_transactions_defaults_and_clamping() {
    let records = (1..=150)
        .map(|i| sale(&format!("Item {}", i), i as f64, "2022-03-01"))
        .collect();
    let (service, _) = service_with(records);

    let defaults = service
        .transactions(TransactionFilter::default(), None, None)
        .await
        .unwrap();
    assert_eq!(defaults.pagination.page, 1);
    assert_eq!(defaults.pagination.per_page, 10);
    assert_eq!(defaults.pagination.total_pages, 15);
    assert_eq!(defaults.transactions.len(), 10);

    let clamped = service
        .transactions(TransactionFilter::default(), Some(1), Some(1000))
        .await
        .unwrap();
    assert_eq!(clamped.pagination.per_page, 100);
    assert_eq!(clamped.transactions.len(), 100);
    assert_eq!(clamped.pagination.total_pages, 2);
}

#[tokio::test]
async fn test_transactions_rejects_bad_paging() {
    let (service, _) = service_with(march_records());

    let err = service
        .transactions(TransactionFilter::default(), Some(0), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = service
        .transactions(TransactionFilter::default(), None, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = service
        .transactions(TransactionFilter::default(), Some(-4), Some(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_transactions_huge_page_is_empty() {
    let (service, _) = service_with(march_records());

    let page = service
        .transactions(TransactionFilter::default(), Some(i64::MAX), Some(100))
        .await
        .unwrap();
    assert!(page.transactions.is_empty());
    assert_eq!(page.pagination.total_records, 2);
}

#[tokio::test]
async fn test_transactions_search() {
    let (service, _) = service_with(vec![
        sale("Backpack", 109.95, "2022-03-01").with_description("Fits 15 inch laptops"),
        sale("Slim Fit Shirt", 22.3, "2022-03-02"),
        sale("Cotton Jacket", 55.99, "2022-03-03"),
    ]);

    let page = service
        .transactions(TransactionFilter::new(None, Some("LAPTOP")), None, None)
        .await
        .unwrap();
    assert_eq!(page.pagination.total_records, 1);
    assert_eq!(page.transactions[0].product_title, "Backpack");

    let page = service
        .transactions(TransactionFilter::new(None, Some("55.99")), None, None)
        .await
        .unwrap();
    assert_eq!(page.transactions[0].product_title, "Cotton Jacket");
}

#[tokio::test]
async fn test_month_one_excludes_november() {
    let (service, _) = service_with(vec![
        sale("January", 10.0, "2022-01-10"),
        sale("November", 20.0, "2021-11-10"),
    ]);

    let page = service
        .transactions(
            TransactionFilter::for_month(Some(MonthFilter::MonthOfYear(1))),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(page.pagination.total_records, 1);
    assert_eq!(page.transactions[0].product_title, "January");
}

#[tokio::test]
async fn test_combined_matches_individual_results() {
    let (service, _) = service_with(march_records());

    let combined = service.combined(march()).await.unwrap();
    assert_eq!(
        combined.transactions,
        service
            .transactions(TransactionFilter::for_month(march()), None, None)
            .await
            .unwrap()
    );
    assert_eq!(combined.statistics, service.statistics(march()).await.unwrap());
    assert_eq!(combined.bar_chart, service.bar_chart(march()).await.unwrap());
    assert_eq!(combined.pie_chart, service.pie_chart(march()).await.unwrap());
}

#[tokio::test]
async fn test_combined_fails_when_any_part_fails() {
    let (service, store) = service_with(march_records());
    store.fail_on(StoreOperation::SaleTotals).await;

    let err = service.combined(march()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    store.recover(StoreOperation::SaleTotals).await;
    store.fail_on(StoreOperation::PriceRange).await;
    assert!(service.combined(march()).await.is_err());

    store.recover(StoreOperation::PriceRange).await;
    assert!(service.combined(march()).await.is_ok());
}

#[test]
fn test_month_label() {
    assert_eq!(month_label(None), "any");
    assert_eq!(month_label(march()), "03");
    assert_eq!(
        month_label(Some(MonthFilter::YearMonth {
            year: 2022,
            month: 11
        })),
        "2022-11"
    );
}

#[tokio::test]
async fn test_transactions_search_matches_price_text() {
    let (service, _) = service_with(vec![
        sale("Jacket", 150.0, "2022-03-15"),
        sale("Backpack", 329.85, "2022-03-01"),
    ]);

    for (needle, expected) in [("15", "Jacket"), ("329", "Backpack"), (".85", "Backpack")] {
        let page = service
            .transactions(TransactionFilter::new(None, Some(needle)), None, None)
            .await
            .unwrap();
        assert_eq!(page.pagination.total_records, 1, "search {}", needle);
        assert_eq!(page.transactions[0].product_title, expected);
    }
}
