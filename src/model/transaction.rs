use crate::model::month::extract_sale_date;
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// One stored product sale or listing.
///
/// `sale_date` is derived from `date_of_sale` by [`extract_sale_date`] when the record is built
/// and is `None` when the raw value could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The identifier supplied by the feed; also the primary key.
    pub(crate) id: i64,
    pub(crate) title: Option<String>,
    pub(crate) category: String,
    pub(crate) price: f64,
    pub(crate) is_sold: bool,
    /// The value exactly as the feed supplied it.
    pub(crate) date_of_sale: String,
    pub(crate) sale_date: Option<NaiveDate>,
}

impl TransactionRecord {
    pub fn new(
        id: i64,
        category: impl Into<String>,
        price: f64,
        is_sold: bool,
        date_of_sale: impl Into<String>,
    ) -> Self {
        let date_of_sale = date_of_sale.into();
        let sale_date = extract_sale_date(&date_of_sale);
        Self {
            id,
            title: None,
            category: category.into(),
            price,
            is_sold,
            date_of_sale,
            sale_date,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_sold(&self) -> bool {
        self.is_sold
    }

    pub fn date_of_sale(&self) -> &str {
        &self.date_of_sale
    }

    pub fn sale_date(&self) -> Option<NaiveDate> {
        self.sale_date
    }

    /// The month used for filtering, if the sale date could be parsed.
    pub fn sale_month(&self) -> Option<Month> {
        self.sale_date
            .and_then(|d| Month::try_from(d.month() as u8).ok())
    }
}
