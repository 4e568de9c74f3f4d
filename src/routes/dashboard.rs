use crate::{
    dashboard::{CategoryCount, CombinedData, PriceRangeCount, Statistics, TransactionsPage},
    database::filter::{MonthFilter, TransactionFilter},
    error::AppError,
    routes::ApiQuery,
    server::Server,
};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Deserialize;

/// Create the dashboard query routes
pub fn create_dashboard_routes() -> Router<Server> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/statistics", get(get_statistics))
        .route("/bar-chart", get(get_bar_chart))
        .route("/pie-chart", get(get_pie_chart))
        .route("/combine-data", get(get_combined_data))
}

/// Query parameters for the transactions listing
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

/// Query parameters shared by the aggregate endpoints
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    fn month(&self) -> Result<Option<MonthFilter>, AppError> {
        Ok(MonthFilter::parse_optional(self.month.as_deref())?)
    }
}

/// Paging values arrive as text so an empty value can mean "use the default"
fn parse_paging(name: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            AppError::BadRequest(format!("{} must be an integer, got '{}'", name, value))
        }),
    }
}

async fn list_transactions(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<TransactionsQuery>,
) -> Result<Json<TransactionsPage>, AppError> {
    let month = MonthFilter::parse_optional(params.month.as_deref())?;
    let page = parse_paging("page", params.page.as_deref())?;
    let per_page = parse_paging("perPage", params.per_page.as_deref())?;
    let filter = TransactionFilter::new(month, params.search.as_deref());

    let listing = server.dashboard.transactions(filter, page, per_page).await?;
    Ok(Json(listing))
}

async fn get_statistics(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<MonthQuery>,
) -> Result<Json<Statistics>, AppError> {
    let stats = server.dashboard.statistics(params.month()?).await?;
    Ok(Json(stats))
}

async fn get_bar_chart(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, AppError> {
    let bars = server.dashboard.bar_chart(params.month()?).await?;
    Ok(Json(bars))
}

async fn get_pie_chart(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    let slices = server.dashboard.pie_chart(params.month()?).await?;
    Ok(Json(slices))
}

async fn get_combined_data(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<MonthQuery>,
) -> Result<Json<CombinedData>, AppError> {
    let combined = server.dashboard.combined(params.month()?).await?;
    Ok(Json(combined))
}
