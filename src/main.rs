use clap::Parser;
use sales_report::args::{Args, Command};
use sales_report::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for running the program without network access. When
    // SALES_REPORT_IN_TEST_MODE is set and non-zero in length, then the mode will be
    // Mode::Testing, otherwise it will be Mode::Remote.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.source_url())
            .await?
            .print(),

        Command::Seed => commands::seed(Config::load(home).await?, mode)
            .await?
            .print(),

        Command::Statistics(month_args) => {
            commands::statistics(Config::load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::BarChart(month_args) => {
            commands::bar_chart(Config::load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::PieChart(month_args) => {
            commands::pie_chart(Config::load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::Combined(month_args) => {
            commands::combined(Config::load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::Serve(serve_args) => commands::serve(
            Config::load(home).await?,
            mode,
            serve_args.host(),
            serve_args.port(),
        )
        .await?
        .print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and request tracing.
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                level,
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
