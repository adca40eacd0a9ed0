//! These structs provide the CLI interface for the sales-report CLI.

use crate::config::DEFAULT_SOURCE_URL;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// sales-report: monthly sales reports over a product-transaction feed.
///
/// The program downloads a JSON feed of product transactions into a local SQLite database and
/// reports on it one calendar month at a time: summary statistics, a price-range histogram and a
/// category breakdown. Reports can be printed from the command line or served over HTTP.
///
/// Setting SALES_REPORT_IN_TEST_MODE to any non-empty value makes `seed` and the
/// `/initialize-database` endpoint use a small built-in data set instead of the network.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/sales-report; pass --home to put it somewhere else.
    Init(InitArgs),
    /// Download the feed and load it into the database.
    ///
    /// Rows are keyed by the feed's id, so seeding again replaces rows instead of adding
    /// duplicates. Items that cannot be stored are listed in the output.
    Seed,
    /// Print total sale amount and sold / not sold counts for a month.
    Statistics(MonthArgs),
    /// Print the number of items in each price range for a month.
    BarChart(MonthArgs),
    /// Print the number of items in each category for a month.
    PieChart(MonthArgs),
    /// Print statistics, price ranges and categories for a month in one document.
    Combined(MonthArgs),
    /// Serve the reports over HTTP.
    Serve(ServeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter documentation.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where data and configuration are held. Defaults to ~/sales-report
    #[arg(long, env = "SALES_REPORT_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `sales-report init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the JSON product-transaction feed.
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source_url: String,
}

impl InitArgs {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// (Not shown): Args for the report commands.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    /// The month to report on: a name (January), an abbreviation (jan) or a number (1-12). Sales
    /// from every year are included.
    #[arg(long)]
    month: String,
}

impl MonthArgs {
    pub fn new(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
        }
    }

    pub fn month(&self) -> &str {
        &self.month
    }
}

/// (Not shown): Args for the `sales-report serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The address to listen on. Defaults to the `host` value in config.json.
    #[arg(long)]
    host: Option<String>,

    /// The port to listen on. Defaults to the `port` value in config.json.
    #[arg(long)]
    port: Option<u16>,
}

impl ServeArgs {
    pub fn new(host: Option<String>, port: Option<u16>) -> Self {
        Self { host, port }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("sales-report"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SALES_REPORT_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("sales-report")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
