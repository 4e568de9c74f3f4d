pub mod transactions;

pub use transactions::{NewTransaction, parse_sale_date, render_price};

// Type aliases
pub type TransactionRecord = transactions::Model;
