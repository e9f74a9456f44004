use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::config::Settings;
use crate::core::data::ProjectTotal;
use crate::sync::MetricsClient;
use crate::sync::rize::RizeClient;
use crate::utils::OutputStyle;
use crate::utils::dates::today;

/// Fetch project totals for the requested day and keep the top `limit`.
pub async fn top_projects(
    client: &dyn MetricsClient,
    args: &ReportArgs,
) -> Result<Vec<ProjectTotal>> {
    let date = args.date.unwrap_or_else(today);
    let mut projects = client
        .fetch_projects(date)
        .await
        .with_context(|| format!("Failed to fetch project entries for {}", date))?;
    projects.truncate(args.limit);
    Ok(projects)
}

pub async fn handle_projects_command(settings: &Settings, args: &ReportArgs) -> Result<()> {
    let client = RizeClient::new(settings).context("Failed to create Rize client")?;
    let date = args.date.unwrap_or_else(today);

    let projects = top_projects(&client, args).await?;
    info!(%date, count = projects.len(), "fetched project totals");
    OutputStyle::print_projects(date, &projects, args.limit);

    Ok(())
}
