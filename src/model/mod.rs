//! Types that represent the core data model: stored transactions, the month rule and the
//! histogram price ranges.
mod bucket;
mod month;
mod transaction;

pub use bucket::PriceBucket;
pub(crate) use month::month_number;
pub use month::{extract_sale_date, parse_month_label};
pub use transaction::TransactionRecord;
