//! The transaction store contract.
//!
//! Reports and the Seeder never reach for a global connection. They are handed something that
//! implements [`TransactionStore`]: the SQLite-backed `Db` in production, or an in-memory
//! double in tests.

use crate::error::Res;
use crate::model::TransactionRecord;
use chrono::Month;
use serde::{Deserialize, Serialize};

/// Persistent collection of transaction records.
#[async_trait::async_trait]
pub(crate) trait TransactionStore: Send + Sync {
    /// Inserts `records`, replacing any stored row that has the same id. Row-level failures are
    /// collected in the returned report and do not abort the batch. An `Err` means the batch as a
    /// whole could not be written.
    async fn upsert(&self, records: Vec<NewRecord>) -> Res<InsertReport>;

    /// Returns every record whose sale date falls in `month` of any year, ordered by id.
    async fn query_by_month(&self, month: Month) -> Res<Vec<TransactionRecord>>;

    /// Total number of stored records.
    async fn count(&self) -> Res<u64>;
}

/// A record handed to the store by the Seeder. Either a valid record, or the reason the raw feed
/// item could not become one, so that the failure is reported next to the rows that did load.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NewRecord {
    Valid(TransactionRecord),
    Invalid { id: Option<i64>, reason: String },
}

/// The outcome of a bulk insert.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertReport {
    /// Rows that were inserted or replaced.
    pub upserted: u64,
    /// Rows that were not written.
    pub failures: Vec<RowFailure>,
}

impl InsertReport {
    pub(crate) fn record_failure(&mut self, index: usize, id: Option<i64>, reason: impl Into<String>) {
        self.failures.push(RowFailure {
            index,
            id,
            reason: reason.into(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// A row that could not be written.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    /// Position of the row in the fetched batch.
    pub index: usize,
    /// The feed's id for the row, when it had one.
    pub id: Option<i64>,
    pub reason: String,
}
