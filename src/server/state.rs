use crate::report::with_cancel;
use crate::source::DataSource;
use crate::store::TransactionStore;
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Shared application state for the server.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn TransactionStore>,
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) fetch_timeout: Duration,
    pub(crate) query_timeout: Duration,
    /// Held while the Seeder runs so that two seed requests never write at the same time.
    pub(crate) seed_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub(crate) fn new(
        store: Arc<dyn TransactionStore>,
        source: Arc<dyn DataSource>,
        fetch_timeout: Duration,
        query_timeout: Duration,
    ) -> Self {
        Self {
            store,
            source,
            fetch_timeout,
            query_timeout,
            seed_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Runs a report, abandoning it once the query timeout elapses.
    pub(crate) async fn run_report<T, F>(&self, report: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        with_cancel(tokio::time::sleep(self.query_timeout), report).await
    }
}
