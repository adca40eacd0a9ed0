//! Where the Seeder gets its raw records from.
//!
//! The `DataSource` trait is the seam between the program and the outside world. `HttpSource`
//! downloads the JSON feed; `TestSource` serves a small built-in data set so the whole program
//! can run, top to bottom, without network access.

mod http;
mod test_source;

use crate::error::Res;
use crate::model::TransactionRecord;
use crate::store::NewRecord;
use crate::Config;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub(crate) use http::HttpSource;
pub(crate) use test_source::TestSource;

/// Setting this environment variable to a non-empty value selects [`Mode::Testing`].
const TEST_MODE_ENV: &str = "SALES_REPORT_IN_TEST_MODE";

/// Whether records come from the configured feed or from built-in test data.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Remote,
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Remote,
        }
    }
}

/// Something that can produce the raw feed.
///
/// The feed must be a JSON array. Items are returned undecoded so that one malformed item becomes
/// a row failure instead of failing the whole fetch; see [`decode_item`].
#[async_trait::async_trait]
pub(crate) trait DataSource: Send + Sync {
    async fn fetch(&self) -> Res<Vec<Value>>;
}

/// Constructs the `DataSource` for `mode`.
pub(crate) fn data_source(config: &Config, mode: Mode) -> Res<Arc<dyn DataSource>> {
    Ok(match mode {
        Mode::Remote => Arc::new(HttpSource::new(config.source_url(), config.fetch_timeout())?),
        Mode::Testing => Arc::new(TestSource::default()),
    })
}

/// One item of the product-transaction feed, as published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    #[serde(alias = "Sold")]
    pub sold: Option<bool>,
    pub date_of_sale: Option<String>,
}

impl SourceRecord {
    /// Checks the fields the store needs and converts the item into a storable record.
    pub(crate) fn into_new_record(self) -> NewRecord {
        let id = match self.id {
            Some(id) => id,
            None => return invalid(None, "missing id"),
        };
        let price = match self.price {
            Some(price) if price.is_finite() && price >= 0.0 => price,
            Some(price) => return invalid(Some(id), format!("invalid price {price}")),
            None => return invalid(Some(id), "missing price"),
        };
        let category = match self.category {
            Some(category) => category,
            None => return invalid(Some(id), "missing category"),
        };
        let sold = match self.sold {
            Some(sold) => sold,
            None => return invalid(Some(id), "missing sold flag"),
        };
        let date_of_sale = match self.date_of_sale {
            Some(date) => date,
            None => return invalid(Some(id), "missing dateOfSale"),
        };

        let mut record = TransactionRecord::new(id, category, price, sold, date_of_sale);
        if let Some(title) = self.title {
            record = record.with_title(title);
        }
        NewRecord::Valid(record)
    }
}

/// Decodes one feed item and converts it into a storable record. An item whose fields have the
/// wrong JSON types is reported as invalid, keeping its id when the id itself is readable.
pub(crate) fn decode_item(item: Value) -> NewRecord {
    let id = item.get("id").and_then(Value::as_i64);
    match serde_json::from_value::<SourceRecord>(item) {
        Ok(record) => record.into_new_record(),
        Err(e) => invalid(id, format!("malformed item: {e}")),
    }
}

fn invalid(id: Option<i64>, reason: impl Into<String>) -> NewRecord {
    NewRecord::Invalid {
        id,
        reason: reason.into(),
    }
}
