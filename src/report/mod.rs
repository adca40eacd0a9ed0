//! The monthly reports: summary statistics, the price histogram, the category distribution and
//! the combined view of all three.
//!
//! Each report is a pure computation over the records that a [`TransactionStore`] returns for
//! one month. The async entry points in this module resolve the month label, run the query and
//! hand the rows to the computation.
//!
//! A month label that is missing or unrecognized does not raise an error. It is treated like a
//! month without any sales: statistics are zero, every histogram range is zero and the
//! distribution is empty. The store is not queried in that case.

mod categories;
mod combined;
mod histogram;
mod statistics;

pub use categories::CategoryCount;
pub use combined::Combined;
pub use histogram::Histogram;
pub use statistics::Statistics;

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{parse_month_label, TransactionRecord};
use crate::store::TransactionStore;
use crate::Result;
use anyhow::anyhow;
use categories::compute_category_distribution;
use combined::compute_combined;
use histogram::compute_histogram;
use statistics::compute_statistics;
use std::future::Future;
use tracing::{debug, warn};

pub(crate) async fn statistics(
    store: &dyn TransactionStore,
    month_label: &str,
) -> Result<Statistics> {
    let records = month_records(store, month_label).await?;
    Ok(compute_statistics(&records))
}

pub(crate) async fn bar_chart(store: &dyn TransactionStore, month_label: &str) -> Result<Histogram> {
    let records = month_records(store, month_label).await?;
    Ok(compute_histogram(&records))
}

pub(crate) async fn pie_chart(
    store: &dyn TransactionStore,
    month_label: &str,
) -> Result<Vec<CategoryCount>> {
    let records = month_records(store, month_label).await?;
    Ok(compute_category_distribution(&records))
}

/// All three reports for one month, computed from a single query so that they agree with each
/// other. Fails as a whole if the query fails.
pub(crate) async fn combined(store: &dyn TransactionStore, month_label: &str) -> Result<Combined> {
    let records = month_records(store, month_label).await?;
    Ok(compute_combined(&records))
}

/// Runs `report` unless `signal` completes first, in which case the report is dropped and a
/// [`ErrorType::Cancelled`] error is returned.
pub(crate) async fn with_cancel<T, S, F>(signal: S, report: F) -> Result<T>
where
    S: Future<Output = ()>,
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        result = report => result,
        _ = signal => Err(Error::new(ErrorType::Cancelled, anyhow!("The report was cancelled"))),
    }
}

async fn month_records(
    store: &dyn TransactionStore,
    month_label: &str,
) -> Result<Vec<TransactionRecord>> {
    let month = match parse_month_label(month_label) {
        Some(month) => month,
        None => {
            warn!("'{month_label}' is not a month, returning an empty report");
            return Ok(Vec::new());
        }
    };
    let records = store
        .query_by_month(month)
        .await
        .pub_result(ErrorType::StoreRead)?;
    debug!("{} records in {}", records.len(), month.name());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceBucket;
    use crate::store::NewRecord;
    use crate::test::{MemoryStore, TestEnv};
    use std::time::Duration;

    fn valid(id: i64, category: &str, price: f64, sold: bool, date: &str) -> NewRecord {
        NewRecord::Valid(TransactionRecord::new(id, category, price, sold, date))
    }

    async fn january_store() -> MemoryStore {
        let store = MemoryStore::default();
        store
            .upsert(vec![
                valid(1, "A", 50.0, true, "Jan 2023"),
                valid(2, "B", 150.0, false, "Jan 2023"),
                valid(3, "A", 900.0, true, "2022-02-10"),
                valid(4, "C", 12.0, true, "not a date"),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_january_example() {
        let store = january_store().await;

        let stats = statistics(&store, "January").await.unwrap();
        assert_eq!(
            stats,
            Statistics {
                total_sale_amount: 200.0,
                total_sold_items: 1,
                total_not_sold_items: 1,
            }
        );

        let histogram = bar_chart(&store, "January").await.unwrap();
        assert_eq!(histogram.get(PriceBucket::Range0To100), 1);
        assert_eq!(histogram.get(PriceBucket::Range101To200), 1);
        assert_eq!(histogram.total(), 2);

        let distribution = pie_chart(&store, "January").await.unwrap();
        assert_eq!(
            distribution,
            vec![
                CategoryCount {
                    category: "A".to_string(),
                    item_count: 1
                },
                CategoryCount {
                    category: "B".to_string(),
                    item_count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_month_label_forms_agree() {
        let store = january_store().await;
        let expected = statistics(&store, "January").await.unwrap();
        for label in ["january", "JAN", "1", "01"] {
            assert_eq!(statistics(&store, label).await.unwrap(), expected, "{label}");
        }
    }

    #[tokio::test]
    async fn test_month_without_data_is_zero() {
        let store = january_store().await;
        assert_eq!(
            statistics(&store, "March").await.unwrap(),
            Statistics::default()
        );
        assert_eq!(bar_chart(&store, "March").await.unwrap().total(), 0);
        assert!(pie_chart(&store, "March").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_month_is_empty_and_skips_the_store() {
        // A failing store proves that no query is issued.
        let store = MemoryStore::failing();
        for label in ["", "Smarch", "13"] {
            assert_eq!(
                statistics(&store, label).await.unwrap(),
                Statistics::default()
            );
            assert_eq!(bar_chart(&store, label).await.unwrap(), Histogram::default());
            assert!(pie_chart(&store, label).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_store_read() {
        let store = MemoryStore::failing();
        let err = statistics(&store, "May").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StoreRead);
        let err = combined(&store, "May").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::StoreRead);
    }

    #[tokio::test]
    async fn test_combined_matches_individual_reports() {
        let env = TestEnv::seeded().await;
        let db = env.config().db().clone();
        for month in 1..=12 {
            let label = month.to_string();
            let combined = combined(&db, &label).await.unwrap();
            assert_eq!(combined.statistics, statistics(&db, &label).await.unwrap());
            assert_eq!(combined.bar_chart, bar_chart(&db, &label).await.unwrap());
            assert_eq!(combined.pie_chart, pie_chart(&db, &label).await.unwrap());

            let count = db
                .query_by_month(parse_month_label(&label).unwrap())
                .await
                .unwrap()
                .len() as u64;
            assert_eq!(combined.bar_chart.total(), count);
            let pie_total: u64 = combined.pie_chart.iter().map(|c| c.item_count).sum();
            assert_eq!(pie_total, count);
            assert_eq!(
                combined.statistics.total_sold_items + combined.statistics.total_not_sold_items,
                count
            );
        }
    }

    #[tokio::test]
    async fn test_seeded_november() {
        let env = TestEnv::seeded().await;
        let db = env.config().db().clone();
        let stats = statistics(&db, "November").await.unwrap();
        assert_eq!(stats.total_sold_items, 3);
        assert_eq!(stats.total_not_sold_items, 1);
        assert!((stats.total_sale_amount - 671.35).abs() < 1e-9);

        let histogram = bar_chart(&db, "Nov").await.unwrap();
        assert_eq!(histogram.get(PriceBucket::Range0To100), 1);
        assert_eq!(histogram.get(PriceBucket::Range101To200), 2);
        assert_eq!(histogram.get(PriceBucket::Range301To400), 1);
    }

    #[tokio::test]
    async fn test_with_cancel() {
        let store = january_store().await;

        let done = with_cancel(std::future::pending(), statistics(&store, "January"))
            .await
            .unwrap();
        assert_eq!(done.total_sold_items, 1);

        let never = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Statistics::default())
        };
        let err = with_cancel(tokio::time::sleep(Duration::from_millis(10)), never)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Cancelled);
    }
}
