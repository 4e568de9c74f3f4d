use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sales_dashboard::database::entities::{NewTransaction, parse_sale_date};
use serde_json::Value;
use tower::ServiceExt;

/// Build a sale record from a bare `YYYY-MM-DD` or RFC 3339 date
pub fn sale(title: &str, price: f64, date: &str) -> NewTransaction {
    NewTransaction::new(title, price, parse_sale_date(date).unwrap())
}

/// The two March records used throughout the dashboard scenarios
pub fn march_records() -> Vec<NewTransaction> {
    vec![
        sale("Backpack", 50.0, "2022-03-01").with_category("A"),
        sale("Jacket", 150.0, "2022-03-15").with_category("B"),
    ]
}

/// Send a GET request and decode the JSON body
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{} returned non-JSON body: {}", uri, e));
    (status, json)
}
