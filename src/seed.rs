//! The Seeder: fetches the feed once and loads it into the store.

use crate::error::{Error, ErrorType, IntoResult};
use crate::source::{decode_item, DataSource};
use crate::store::{InsertReport, NewRecord, TransactionStore};
use crate::Result;
use anyhow::anyhow;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches every record from `source` and upserts it into `store`.
///
/// The fetch is abandoned after `fetch_timeout`. Items that cannot be stored are reported in the
/// returned [`InsertReport`] and do not stop the rest of the batch. Running this twice with the
/// same feed leaves the store unchanged the second time, because rows are keyed by the feed's id.
///
/// # Errors
/// - [`ErrorType::DataSource`] when the feed cannot be fetched in time.
/// - [`ErrorType::StoreWrite`] when the batch as a whole cannot be written.
pub(crate) async fn seed(
    source: &dyn DataSource,
    store: &dyn TransactionStore,
    fetch_timeout: Duration,
) -> Result<InsertReport> {
    let items = match tokio::time::timeout(fetch_timeout, source.fetch()).await {
        Ok(fetched) => fetched.pub_result(ErrorType::DataSource)?,
        Err(_) => {
            return Err(Error::new(
                ErrorType::DataSource,
                anyhow!(
                    "Fetching the feed took longer than {} seconds",
                    fetch_timeout.as_secs_f64()
                ),
            ))
        }
    };
    debug!("Fetched {} items from the data source", items.len());

    let records: Vec<NewRecord> = items.into_iter().map(decode_item).collect();
    let report = store
        .upsert(records)
        .await
        .pub_result(ErrorType::StoreWrite)?;

    info!(
        "Seeded {} transactions, {} rows failed",
        report.upserted,
        report.failed()
    );
    Ok(report)
}
