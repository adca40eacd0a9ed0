use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` file using `source_url` along with default settings
/// - Creates the SQLite database with an empty `product_transactions` table
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/sales-report`
/// - `source_url` - The URL of the JSON product-transaction feed that `seed` downloads.
///
/// # Errors
/// - Returns an error if the URL is not http(s), if a database already exists in `home`, or if
///   any file operation fails.
pub async fn init(home: &Path, source_url: &str) -> Result<Out<()>> {
    let config = Config::create(home, source_url)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the sales-report directory at {} (config: {}, database: {})",
        config.root().display(),
        config.config_path().display(),
        config.sqlite_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, "https://example.com/feed.json").await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(out.structure().is_none());

        let config = Config::load(&home).await.unwrap();
        let config_path = config.config_path().display().to_string();
        let sqlite_path = config.sqlite_path().display().to_string();
        assert!(out.message().contains(&config_path), "{}", out.message());
        assert!(out.message().contains(&sqlite_path), "{}", out.message());
        assert!(config.config_path().is_file());
        assert!(config.sqlite_path().is_file());

        let err = init(&home, "https://example.com/other.json")
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        let reloaded = Config::load(&home).await.unwrap();
        assert_eq!(reloaded.source_url(), "https://example.com/feed.json");
    }
}
