//! Configuration file handling.
//!
//! The configuration file is stored at `$SALES_REPORT_HOME/config.json` and holds the URL of the
//! product-transaction feed, timeouts, and the address the HTTP server listens on. The SQLite
//! database lives next to it.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res};
use crate::utils;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "sales-report";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const SALES_SQLITE: &str = "sales.sqlite";
const FETCH_TIMEOUT_SECS: u64 = 30;
const QUERY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3004;

/// The feed that the original dashboard was built against.
pub const DEFAULT_SOURCE_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SALES_REPORT_HOME` and from there it loads `config.json` and opens the SQLite
/// database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the home directory and:
    /// - Creates the SQLite database and its schema
    /// - Writes an initial `config.json` using `source_url` along with default settings
    ///
    /// # Errors
    /// - Returns an error if `source_url` is not a valid http(s) URL.
    /// - Returns an error if the home directory already holds a config file or a database. Neither
    ///   file is modified in that case.
    /// - Returns an error if any file or database operation fails.
    pub(crate) async fn create(dir: impl Into<PathBuf>, source_url: &str) -> Res<Self> {
        validate_source_url(source_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display());
        }

        // The database goes first so that a failed init never leaves a config file behind.
        let sqlite_path = root.join(SALES_SQLITE);
        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;

        let config_file = ConfigFile {
            source_url: source_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load the config file
    /// - open the SQLite database, migrating its schema if it is out of date
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_home(home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_home(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The home directory is missing, run 'sales-report init' first")?;
        let _ = utils::read_dir(&root).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(SALES_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn source_url(&self) -> &str {
        &self.config_file.source_url
    }

    /// Upper bound on how long the Seeder may spend fetching the feed.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.fetch_timeout_secs)
    }

    /// Upper bound on how long a single report may run before it is abandoned.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.query_timeout_secs)
    }

    pub fn host(&self) -> &str {
        &self.config_file.host
    }

    pub fn port(&self) -> u16 {
        self.config_file.port
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales-report",
///   "config_version": 1,
///   "source_url": "https://s3.amazonaws.com/roxiler.com/product_transaction.json",
///   "fetch_timeout_secs": 30,
///   "query_timeout_secs": 10,
///   "host": "127.0.0.1",
///   "port": 3004
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales-report"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the JSON product-transaction feed
    source_url: String,

    #[serde(default = "default_fetch_timeout_secs")]
    fetch_timeout_secs: u64,

    #[serde(default = "default_query_timeout_secs")]
    query_timeout_secs: u64,

    #[serde(default = "default_host")]
    host: String,

    #[serde(default = "default_port")]
    port: u16,
}

fn default_fetch_timeout_secs() -> u64 {
    FETCH_TIMEOUT_SECS
}

fn default_query_timeout_secs() -> u64 {
    QUERY_TIMEOUT_SECS
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            query_timeout_secs: QUERY_TIMEOUT_SECS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it holds invalid values.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        validate_source_url(&config.source_url)?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

/// Only absolute http(s) URLs make sense as a feed location.
fn validate_source_url(source_url: &str) -> Res<()> {
    let url = Url::parse(source_url)
        .with_context(|| format!("Invalid source URL '{source_url}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("Unsupported scheme '{other}' in source URL, expected http or https"),
    }
}
