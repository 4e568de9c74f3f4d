//! Typed filters shared by every transaction store.
//!
//! The month parameter is parsed once at the HTTP edge and compared against the
//! `sale_year` / `sale_month` columns, so month `1` never matches November.

use crate::database::entities::TransactionRecord;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Width of every bounded histogram bucket
pub const PRICE_BUCKET_WIDTH: u32 = 100;
/// Number of histogram buckets, the last one is open-ended
pub const PRICE_BUCKET_COUNT: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid month '{0}': expected 1-12, a month name, or YYYY-MM")]
    InvalidMonth(String),
}

/// Month restriction applied to `date_of_sale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// The given calendar month of any year
    MonthOfYear(u32),
    /// One specific month of one specific year
    YearMonth { year: i32, month: u32 },
}

impl MonthFilter {
    pub fn month(&self) -> u32 {
        match self {
            MonthFilter::MonthOfYear(month) => *month,
            MonthFilter::YearMonth { month, .. } => *month,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            MonthFilter::MonthOfYear(_) => None,
            MonthFilter::YearMonth { year, .. } => Some(*year),
        }
    }

    pub fn matches(&self, sale_year: i32, sale_month: i32) -> bool {
        sale_month == self.month() as i32 && self.year().is_none_or(|year| year == sale_year)
    }

    /// Parse an optional query value; absent or blank means no restriction
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, FilterError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

fn parse_month_number(value: &str) -> Option<u32> {
    if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().filter(|month| (1..=12).contains(month))
}

fn parse_month_name(value: &str) -> Option<u32> {
    let lowered = value.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == lowered || (lowered.len() == 3 && name.starts_with(&lowered)))
        .map(|index| index as u32 + 1)
}

impl FromStr for MonthFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let invalid = || FilterError::InvalidMonth(s.to_string());

        if let Some((year, month)) = value.split_once('-') {
            if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let year = year.parse().map_err(|_| invalid())?;
            let month = parse_month_number(month).ok_or_else(invalid)?;
            return Ok(MonthFilter::YearMonth { year, month });
        }

        parse_month_number(value)
            .or_else(|| parse_month_name(value))
            .map(MonthFilter::MonthOfYear)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::MonthOfYear(month) => write!(f, "{:02}", month),
            MonthFilter::YearMonth { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

/// Case folding applied to search text and to the searched fields.
///
/// ASCII only, matching SQLite's `LOWER()`; the SQL side folds the same way on
/// every backend.
pub fn fold_case(text: &str) -> String {
    text.to_ascii_lowercase()
}

/// Filter for listing transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub month: Option<MonthFilter>,
    /// Case-folded, trimmed search text; `None` when blank
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn new(month: Option<MonthFilter>, search: Option<&str>) -> Self {
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(fold_case);
        Self { month, search }
    }

    pub fn for_month(month: Option<MonthFilter>) -> Self {
        Self {
            month,
            search: None,
        }
    }

    /// In-process evaluation, kept in step with the SQL condition built by the DAO
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some(month) = self.month {
            if !month.matches(record.sale_year, record.sale_month) {
                return false;
            }
        }

        match &self.search {
            None => true,
            Some(needle) => [
                &record.product_title,
                &record.product_description,
                &record.price_text,
            ]
            .into_iter()
            .any(|field| fold_case(field).contains(needle.as_str())),
        }
    }
}

/// One histogram bucket: `(above, up_to]`, either side may be open
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRange {
    pub label: String,
    pub above: Option<f64>,
    pub up_to: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.above.is_none_or(|above| price > above) && self.up_to.is_none_or(|up_to| price <= up_to)
    }
}

/// The fixed histogram buckets, in display order.
///
/// Buckets are contiguous so fractional prices (e.g. 100.5) land in exactly one.
pub fn price_ranges() -> Vec<PriceRange> {
    (0..PRICE_BUCKET_COUNT)
        .map(|index| {
            let lower = index * PRICE_BUCKET_WIDTH;
            let upper = lower + PRICE_BUCKET_WIDTH;
            let first_label = if index == 0 { 0 } else { lower + 1 };
            let is_last = index + 1 == PRICE_BUCKET_COUNT;

            PriceRange {
                label: if is_last {
                    format!("{} - above", first_label)
                } else {
                    format!("{} - {}", first_label, upper)
                },
                above: (index > 0).then_some(lower as f64),
                up_to: (!is_last).then_some(upper as f64),
            }
        })
        .collect()
}
