use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_title: String,
    pub product_description: String,
    pub price: f64,
    pub category: Option<String>,
    pub sold: bool,
    pub image: Option<String>,
    pub date_of_sale: DateTimeWithTimeZone,
    /// Calendar year of `date_of_sale` in its own offset
    #[serde(skip)]
    pub sale_year: i32,
    /// Calendar month (1-12) of `date_of_sale` in its own offset
    #[serde(skip)]
    pub sale_month: i32,
    /// `price` as searched by substring, see [`render_price`]
    #[serde(skip)]
    pub price_text: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A sale record as supplied by the product feed, before it has an id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(alias = "title")]
    pub product_title: String,
    #[serde(default, alias = "description")]
    pub product_description: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_sold")]
    pub sold: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "deserialize_sale_date")]
    pub date_of_sale: DateTime<FixedOffset>,
}

fn default_sold() -> bool {
    true
}

impl NewTransaction {
    pub fn new(
        product_title: impl Into<String>,
        price: f64,
        date_of_sale: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            product_title: product_title.into(),
            product_description: String::new(),
            price,
            category: None,
            sold: true,
            image: None,
            date_of_sale,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.product_description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn unsold(mut self) -> Self {
        self.sold = false;
        self
    }

    pub fn sale_year(&self) -> i32 {
        self.date_of_sale.year()
    }

    pub fn sale_month(&self) -> i32 {
        self.date_of_sale.month() as i32
    }

    pub fn price_text(&self) -> String {
        render_price(self.price)
    }

    /// Materialise the stored form with the given id
    pub fn into_model(self, id: i32) -> Model {
        Model {
            id,
            sale_year: self.sale_year(),
            sale_month: self.sale_month(),
            price_text: self.price_text(),
            product_title: self.product_title,
            product_description: self.product_description,
            price: self.price,
            category: self.category,
            sold: self.sold,
            image: self.image,
            date_of_sale: self.date_of_sale,
        }
    }
}

/// Shortest round-trip decimal form: `150.0` renders as `150`, `329.85` as `329.85`
pub fn render_price(price: f64) -> String {
    price.to_string()
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_sale_date(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let value = value.trim();
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Ok(date),
        Err(rfc_err) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset())
            .map_err(|_| rfc_err),
    }
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sale_date(&raw).map_err(serde::de::Error::custom)
}
