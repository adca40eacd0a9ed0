//! The report commands. Each one runs a single monthly report against the local database and
//! prints it as JSON. Pressing Ctrl-C abandons the report.

use crate::commands::Out;
use crate::report::{self, with_cancel, CategoryCount, Combined, Histogram, Statistics};
use crate::{utils, Config, Result};

pub async fn statistics(config: Config, month: &str) -> Result<Out<Statistics>> {
    let stats = with_cancel(
        utils::interrupted(),
        report::statistics(config.db(), month),
    )
    .await?;
    Ok(Out::new(format!("Statistics for '{month}'"), stats))
}

pub async fn bar_chart(config: Config, month: &str) -> Result<Out<Histogram>> {
    let histogram = with_cancel(utils::interrupted(), report::bar_chart(config.db(), month)).await?;
    Ok(Out::new(
        format!("Price ranges for '{month}', {} items", histogram.total()),
        histogram,
    ))
}

pub async fn pie_chart(config: Config, month: &str) -> Result<Out<Vec<CategoryCount>>> {
    let distribution =
        with_cancel(utils::interrupted(), report::pie_chart(config.db(), month)).await?;
    Ok(Out::new(
        format!("{} categories in '{month}'", distribution.len()),
        distribution,
    ))
}

pub async fn combined(config: Config, month: &str) -> Result<Out<Combined>> {
    let combined = with_cancel(utils::interrupted(), report::combined(config.db(), month)).await?;
    Ok(Out::new(format!("Combined report for '{month}'"), combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_report_commands() {
        let env = TestEnv::seeded().await;

        let out = statistics(env.config(), "October").await.unwrap();
        assert_eq!(out.structure().unwrap().total_not_sold_items, 3);

        let out = bar_chart(env.config(), "October").await.unwrap();
        assert_eq!(out.structure().unwrap().total(), 4);
        assert!(out.message().contains("4 items"));

        let out = pie_chart(env.config(), "October").await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 3);

        let out = combined(env.config(), "oct").await.unwrap();
        assert_eq!(out.structure().unwrap().statistics.total_sold_items, 1);
    }

    #[tokio::test]
    async fn test_unknown_month_is_empty() {
        let env = TestEnv::seeded().await;
        let out = pie_chart(env.config(), "Brumaire").await.unwrap();
        assert!(out.structure().unwrap().is_empty());
    }
}
