use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::config::Settings;
use crate::core::data::CategoryTotal;
use crate::sync::MetricsClient;
use crate::sync::rize::RizeClient;
use crate::utils::OutputStyle;
use crate::utils::dates::today;

/// Fetch category totals for the requested day and keep the top `limit`.
pub async fn top_categories(
    client: &dyn MetricsClient,
    args: &ReportArgs,
) -> Result<Vec<CategoryTotal>> {
    let date = args.date.unwrap_or_else(today);
    let mut categories = client
        .fetch_categories(date)
        .await
        .with_context(|| format!("Failed to fetch category totals for {}", date))?;
    categories.truncate(args.limit);
    Ok(categories)
}

pub async fn handle_categories_command(settings: &Settings, args: &ReportArgs) -> Result<()> {
    let client = RizeClient::new(settings).context("Failed to create Rize client")?;
    let date = args.date.unwrap_or_else(today);

    let categories = top_categories(&client, args).await?;
    info!(%date, count = categories.len(), "fetched category totals");
    OutputStyle::print_categories(date, &categories, args.limit);

    Ok(())
}
