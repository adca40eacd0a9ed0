use crate::model::TransactionRecord;
use crate::report::categories::{compute_category_distribution, CategoryCount};
use crate::report::histogram::{compute_histogram, Histogram};
use crate::report::statistics::{compute_statistics, Statistics};
use serde::Serialize;

/// The three monthly reports in one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combined {
    pub statistics: Statistics,
    pub bar_chart: Histogram,
    pub pie_chart: Vec<CategoryCount>,
}

/// Computes all three reports from the same set of records.
pub(crate) fn compute_combined(records: &[TransactionRecord]) -> Combined {
    Combined {
        statistics: compute_statistics(records),
        bar_chart: compute_histogram(records),
        pie_chart: compute_category_distribution(records),
    }
}
