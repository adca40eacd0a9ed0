//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::error::Res;
use crate::model::TransactionRecord;
use crate::seed::seed;
use crate::source::TestSource;
use crate::store::{InsertReport, NewRecord, TransactionStore};
use crate::Config;
use anyhow::bail;
use chrono::Month;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Test environment that sets up a home directory with Config and database.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and an empty, initialized database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("sales-report");
        let config = Config::create(&root, "http://127.0.0.1:9/feed.json")
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose database holds the built-in seed data.
    pub async fn seeded() -> Self {
        let env = Self::new().await;
        let report = seed(
            &TestSource::default(),
            env.config.db(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(report.failed(), 0);
        env
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }
}

/// A `TransactionStore` that keeps records in memory. `failing()` builds one whose every call
/// returns an error.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<BTreeMap<i64, TransactionRecord>>,
    fail: bool,
}

impl MemoryStore {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Res<()> {
        if self.fail {
            bail!("The memory store was told to fail");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn upsert(&self, records: Vec<NewRecord>) -> Res<InsertReport> {
        self.check()?;
        let mut report = InsertReport::default();
        let mut stored = self.records.lock().unwrap();
        for (index, record) in records.into_iter().enumerate() {
            match record {
                NewRecord::Valid(record) => {
                    stored.insert(record.id(), record);
                    report.upserted += 1;
                }
                NewRecord::Invalid { id, reason } => report.record_failure(index, id, reason),
            }
        }
        Ok(report)
    }

    async fn query_by_month(&self, month: Month) -> Res<Vec<TransactionRecord>> {
        self.check()?;
        let stored = self.records.lock().unwrap();
        Ok(stored
            .values()
            .filter(|r| r.sale_month() == Some(month))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Res<u64> {
        self.check()?;
        Ok(self.records.lock().unwrap().len() as u64)
    }
}
