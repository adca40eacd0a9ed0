use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::source::data_source;
use crate::store::InsertReport;
use crate::{Config, Mode, Result};

/// Downloads the feed and loads it into the database. This is the CLI counterpart of
/// `POST /initialize-database`. Running it again replaces rows that have the same id.
pub async fn seed(config: Config, mode: Mode) -> Result<Out<InsertReport>> {
    let source = data_source(&config, mode).pub_result(ErrorType::Config)?;
    let report =
        crate::seed::seed(source.as_ref(), config.db(), config.fetch_timeout()).await?;
    let message = format!(
        "Loaded {} transactions from {} source, {} rows failed",
        report.upserted,
        mode,
        report.failed()
    );
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TransactionStore;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_seed_command_in_testing_mode() {
        let env = TestEnv::new().await;
        let out = seed(env.config(), Mode::Testing).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.upserted, 12);
        assert_eq!(report.failed(), 0);
        assert!(out.message().contains("testing"));
        assert_eq!(env.config().db().count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seed_command_unreachable_source() {
        // The test config points at a port nothing listens on.
        let env = TestEnv::new().await;
        let err = seed(env.config(), Mode::Remote).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::DataSource);
    }
}
