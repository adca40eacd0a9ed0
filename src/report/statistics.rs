use crate::model::TransactionRecord;
use serde::{Deserialize, Serialize};

/// Summary figures for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Sum of `price` over every matching record, sold or not.
    pub total_sale_amount: f64,
    pub total_sold_items: u64,
    pub total_not_sold_items: u64,
}

pub(crate) fn compute_statistics(records: &[TransactionRecord]) -> Statistics {
    records
        .iter()
        .fold(Statistics::default(), |mut stats, record| {
            stats.total_sale_amount += record.price();
            if record.is_sold() {
                stats.total_sold_items += 1;
            } else {
                stats.total_not_sold_items += 1;
            }
            stats
        })
}
