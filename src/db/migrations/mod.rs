//! Database schema migrations.
//!
//! Migration files live in this directory:
//! - `migration_NN_up.sql` - Upgrades schema from version `NN-1` to version `NN`
//! - `migration_NN_down.sql` - Downgrades schema from version `NN` to version `NN-1`

use crate::error::Res;
use anyhow::{bail, Context};
use sqlx::SqlitePool;
use tracing::debug;

/// The schema version this build of the program expects.
pub(crate) const CURRENT_VERSION: i32 = 1;

struct Migration {
    /// The version the database is at after `up_sql` runs.
    version: i32,
    up_sql: &'static str,
    down_sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    up_sql: include_str!("migration_01_up.sql"),
    down_sql: include_str!("migration_01_down.sql"),
}];

/// One step of a migration plan: the SQL to run and the version recorded afterwards.
struct Step {
    sql: &'static str,
    version_after: i32,
    label: String,
}

/// Moves the schema from version `from` to version `to`, one migration per transaction.
///
/// The whole plan is validated before anything is executed, so a missing migration never leaves
/// the database half-way between versions.
pub(crate) async fn run(pool: &SqlitePool, from: i32, to: i32) -> Res<()> {
    if from == to {
        debug!("Database already at schema version {to}");
        return Ok(());
    }

    for step in plan(from, to)? {
        debug!("Running migration {}", step.label);
        apply(pool, step.sql, step.version_after)
            .await
            .with_context(|| format!("Migration {} failed", step.label))?;
    }

    debug!("Schema now at version {to}");
    Ok(())
}

/// Builds the ordered list of steps to go from `from` to `to`.
fn plan(from: i32, to: i32) -> Res<Vec<Step>> {
    let find = |version: i32| -> Res<&'static Migration> {
        match MIGRATIONS.iter().find(|m| m.version == version) {
            Some(m) => Ok(m),
            None => bail!(
                "Migration {version} is missing but required to migrate from version {from} to {to}"
            ),
        }
    };

    let mut steps = Vec::new();
    if from < to {
        for version in (from + 1)..=to {
            steps.push(Step {
                sql: find(version)?.up_sql,
                version_after: version,
                label: format!("{version:02} (up)"),
            });
        }
    } else {
        for version in ((to + 1)..=from).rev() {
            steps.push(Step {
                sql: find(version)?.down_sql,
                version_after: version - 1,
                label: format!("{version:02} (down)"),
            });
        }
    }
    Ok(steps)
}

async fn apply(pool: &SqlitePool, sql: &str, version_after: i32) -> Res<()> {
    let mut tx = pool.begin().await.context("Failed to begin migration")?;

    sqlx::raw_sql(sql)
        .execute(&mut *tx)
        .await
        .context("Failed to execute migration SQL")?;

    sqlx::query("UPDATE schema_version SET version = ?")
        .bind(version_after)
        .execute(&mut *tx)
        .await
        .context("Failed to record schema version")?;

    tx.commit().await.context("Failed to commit migration")?;
    Ok(())
}
