use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use std::path::PathBuf;
use anyhow::Result;
use crate::config::Settings;
use crate::commands::{categories, fetch, projects};
use crate::utils::dates::parse_date;

#[derive(Parser)]
#[command(name = "rize-sync")]
#[command(about = "Sync Rize time-tracking metrics into Obsidian daily notes")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE", global = true, help = "YAML config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    /// Run the command. `Ok(false)` means it ran but at least one date failed.
    pub async fn execute(self, settings: &Settings) -> Result<bool> {
        match self {
            Commands::Fetch(args) => {
                let summary = fetch::handle_fetch_command(settings, &args).await?;
                Ok(summary.is_success())
            }
            Commands::Categories(args) => {
                categories::handle_categories_command(settings, &args).await?;
                Ok(true)
            }
            Commands::Projects(args) => {
                projects::handle_projects_command(settings, &args).await?;
                Ok(true)
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily metrics and write them into daily note frontmatter
    Fetch(FetchArgs),

    /// Show time per category for a day
    Categories(ReportArgs),

    /// Show time per project for a day
    Projects(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date, conflicts_with = "days", help = "Sync a single date")]
    pub date: Option<NaiveDate>,

    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..), help = "Sync the last N days, ending today")]
    pub days: Option<u32>,

    #[arg(long, help = "Fetch and print the merged frontmatter without touching the vault")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date, help = "Day to report (defaults to today)")]
    pub date: Option<NaiveDate>,

    #[arg(short, long, default_value_t = 10, help = "Number of rows to show")]
    pub limit: usize,
}
