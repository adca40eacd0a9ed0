//! This module is responsible for reading, writing and managing the SQLite database.

mod migrations;

use crate::error::Res;
use crate::model::{month_number, TransactionRecord};
use crate::store::{InsertReport, NewRecord, TransactionStore};
use anyhow::{bail, Context};
use chrono::Month;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const MAX_CONNECTIONS: u32 = 5;

const UPSERT_SQL: &str = "\
    INSERT INTO product_transactions \
        (id, title, category, price, is_sold, date_of_sale, sale_date, sale_month) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
    ON CONFLICT (id) DO UPDATE SET \
        title = excluded.title, \
        category = excluded.category, \
        price = excluded.price, \
        is_sold = excluded.is_sold, \
        date_of_sale = excluded.date_of_sale, \
        sale_date = excluded.sale_date, \
        sale_month = excluded.sale_month";

const SELECT_BY_MONTH_SQL: &str = "\
    SELECT id, title, category, price, is_sold, date_of_sale, sale_date \
    FROM product_transactions \
    WHERE sale_month = ? \
    ORDER BY id";

/// A handle to the SQLite database. Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;

        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .context("Failed to create schema_version table")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .context("Failed to insert initial schema version")?;

        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Opens a connection pool
    /// - Updates the database schema with migrations if it is out-of-date
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;

        let (version,): (i32,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&pool)
            .await
            .context("Failed to read the schema version")?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema version {version} is newer than this program supports ({})",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&pool, version, migrations::CURRENT_VERSION).await?;
        Ok(Self { pool })
    }
}

async fn connect(path: &Path, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create)
        // Readers keep working while the Seeder holds the write lock.
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

#[async_trait::async_trait]
impl TransactionStore for Db {
    async fn upsert(&self, records: Vec<NewRecord>) -> Res<InsertReport> {
        let mut report = InsertReport::default();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin insert transaction")?;

        for (index, record) in records.into_iter().enumerate() {
            let record = match record {
                NewRecord::Valid(record) => record,
                NewRecord::Invalid { id, reason } => {
                    warn!("Skipping row {index}: {reason}");
                    report.record_failure(index, id, reason);
                    continue;
                }
            };

            // A failed statement is rolled back on its own; the transaction stays usable.
            let result = sqlx::query(UPSERT_SQL)
                .bind(record.id)
                .bind(&record.title)
                .bind(&record.category)
                .bind(record.price)
                .bind(record.is_sold)
                .bind(&record.date_of_sale)
                .bind(record.sale_date)
                .bind(record.sale_month().map(month_number))
                .execute(&mut *tx)
                .await;

            match result {
                Ok(_) => report.upserted += 1,
                Err(e) => {
                    warn!("Unable to insert row {index} (id {}): {e}", record.id);
                    report.record_failure(index, Some(record.id), e.to_string());
                }
            }
        }

        tx.commit()
            .await
            .context("Failed to commit inserted rows")?;
        Ok(report)
    }

    async fn query_by_month(&self, month: Month) -> Res<Vec<TransactionRecord>> {
        sqlx::query_as::<_, TransactionRecord>(SELECT_BY_MONTH_SQL)
            .bind(month_number(month))
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to query transactions for {}", month.name()))
    }

    async fn count(&self) -> Res<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product_transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (TempDir, Db) {
        let dir = TempDir::new().unwrap();
        let db = Db::init(dir.path().join("test.sqlite")).await.unwrap();
        (dir, db)
    }

    fn valid(id: i64, category: &str, price: f64, sold: bool, date: &str) -> NewRecord {
        NewRecord::Valid(TransactionRecord::new(id, category, price, sold, date))
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file() {
        let (dir, _db) = test_db().await;
        assert!(Db::init(dir.path().join("test.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_existing() {
        let (dir, db) = test_db().await;
        db.upsert(vec![valid(1, "a", 1.0, true, "2022-01-02")])
            .await
            .unwrap();
        drop(db);

        let loaded = Db::load(dir.path().join("test.sqlite")).await.unwrap();
        assert_eq!(loaded.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Db::load(dir.path().join("missing.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_query_by_month_ignores_year_and_bad_dates() {
        let (_dir, db) = test_db().await;
        let report = db
            .upsert(vec![
                valid(1, "electronics", 50.0, true, "2021-01-15T10:00:00+05:30"),
                valid(2, "electronics", 150.0, false, "2022-01-31"),
                valid(3, "jewelery", 75.0, true, "2022-02-01"),
                valid(4, "jewelery", 20.0, true, "not a date"),
            ])
            .await
            .unwrap();
        assert_eq!(report.upserted, 4);
        assert!(report.failures.is_empty());

        let january = db.query_by_month(Month::January).await.unwrap();
        let ids: Vec<i64> = january.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(january[0].is_sold());
        assert_eq!(january[1].price(), 150.0);
        assert_eq!(
            january[1].sale_date(),
            chrono::NaiveDate::from_ymd_opt(2022, 1, 31)
        );

        assert!(db.query_by_month(Month::March).await.unwrap().is_empty());
        assert_eq!(db.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let (_dir, db) = test_db().await;
        let batch = || {
            vec![
                valid(1, "a", 10.0, true, "2022-05-01"),
                valid(2, "b", 20.0, false, "2022-05-02"),
            ]
        };
        db.upsert(batch()).await.unwrap();
        db.upsert(batch()).await.unwrap();
        assert_eq!(db.count().await.unwrap(), 2);

        // A changed row replaces the stored one rather than adding a second copy.
        db.upsert(vec![valid(2, "b", 25.0, true, "2022-06-02")])
            .await
            .unwrap();
        assert_eq!(db.count().await.unwrap(), 2);
        let june = db.query_by_month(Month::June).await.unwrap();
        assert_eq!(june.len(), 1);
        assert_eq!(june[0].price(), 25.0);
        assert!(db.query_by_month(Month::May).await.unwrap().len() == 1);
    }

    #[tokio::test]
    async fn test_upsert_reports_row_failures_and_keeps_going() {
        let (_dir, db) = test_db().await;
        let report = db
            .upsert(vec![
                valid(1, "a", 10.0, true, "2022-05-01"),
                NewRecord::Invalid {
                    id: None,
                    reason: "missing id".to_string(),
                },
                // Rejected by the CHECK constraint on price.
                valid(3, "c", -5.0, true, "2022-05-03"),
                valid(4, "d", 40.0, false, "2022-05-04"),
            ])
            .await
            .unwrap();

        assert_eq!(report.upserted, 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].id, None);
        assert_eq!(report.failures[1].index, 2);
        assert_eq!(report.failures[1].id, Some(3));
        assert_eq!(db.count().await.unwrap(), 2);
    }
}
