//! sales-report: loads a product-transaction feed into SQLite and reports on it by month.
//!
//! The reports (summary statistics, a price-range histogram and a category distribution) are
//! available from the command line and over HTTP. See the `args` module for the CLI and the
//! `commands` module for the library entry points.

pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
mod model;
mod report;
mod seed;
mod server;
mod source;
mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::{Config, DEFAULT_SOURCE_URL};
pub use error::{Error, ErrorType, Result};
pub use model::{extract_sale_date, parse_month_label, PriceBucket, TransactionRecord};
pub use report::{CategoryCount, Combined, Histogram, Statistics};
pub use source::{Mode, SourceRecord};
pub use store::{InsertReport, RowFailure};
