use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::cli::FetchArgs;
use crate::config::Settings;
use crate::core::frontmatter::merge_frontmatter;
use crate::core::note::{locate_or_create, note_path, read_note, read_note_if_exists, write_note};
use crate::sync::MetricsClient;
use crate::sync::rize::RizeClient;
use crate::utils::dates::{range_ending, today};
use crate::utils::error::{AppResult, report_error};
use crate::utils::{OutputStyle, print_success, print_warning};

/// Per-date outcome of a sync run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub succeeded: Vec<NaiveDate>,
    pub failed: Vec<NaiveDate>,
    /// Dates never attempted because a fatal error stopped the run.
    pub skipped: Vec<NaiveDate>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Value written to `rize_last_sync`.
    pub sync_date: NaiveDate,
    pub dry_run: bool,
}

/// Target dates for a fetch, oldest first.
pub fn resolve_dates(args: &FetchArgs, default_lookback: u32, today: NaiveDate) -> Vec<NaiveDate> {
    if let Some(date) = args.date {
        return vec![date];
    }
    match args.days {
        Some(days) => range_ending(today, days),
        None if default_lookback > 0 => range_ending(today, default_lookback),
        None => vec![today],
    }
}

/// Fetch, locate, merge and write a single date.
async fn sync_date(
    client: &dyn MetricsClient,
    settings: &Settings,
    date: NaiveDate,
    options: SyncOptions,
) -> AppResult<PathBuf> {
    let metrics = client.fetch_metrics(date).await?;

    if options.dry_run {
        let path = note_path(settings, date)?;
        let merged = merge_frontmatter(&read_note_if_exists(&path)?, &metrics, options.sync_date);
        OutputStyle::print_metrics(&metrics);
        println!("{}", OutputStyle::muted(&merged));
        return Ok(path);
    }

    let path = locate_or_create(date, settings)?;
    let content = read_note(&path)?;
    let merged = merge_frontmatter(&content, &metrics, options.sync_date);
    write_note(&path, &merged)?;
    Ok(path)
}

/// Process every date in order. Per-date failures are logged and recorded;
/// a fatal error stops the loop and marks the remaining dates as skipped.
pub async fn run_sync(
    client: &dyn MetricsClient,
    settings: &Settings,
    dates: &[NaiveDate],
    options: SyncOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (idx, &date) in dates.iter().enumerate() {
        match sync_date(client, settings, date, options).await {
            Ok(path) => {
                info!(%date, path = %path.display(), dry_run = options.dry_run, "synced daily note");
                if options.dry_run {
                    print_warning(&format!("Dry run: {} not modified", path.display()));
                } else {
                    print_success(&format!("{} updated", path.display()));
                }
                summary.succeeded.push(date);
            }
            Err(err) => {
                error!(%date, error = %err, "failed to sync date");
                report_error(&err);
                summary.failed.push(date);

                if err.is_fatal() {
                    let remaining = &dates[idx + 1..];
                    if !remaining.is_empty() {
                        warn!(count = remaining.len(), "aborting run, remaining dates skipped");
                    }
                    summary.skipped.extend_from_slice(remaining);
                    break;
                }
            }
        }
    }

    summary
}

pub async fn handle_fetch_command(settings: &Settings, args: &FetchArgs) -> Result<RunSummary> {
    // Checked before any request so a missing vault costs no API calls
    let daily_logs = settings.daily_logs_dir()?;
    let client = RizeClient::new(settings).context("Failed to create Rize client")?;

    let today = today();
    let dates = resolve_dates(args, settings.default_days_lookback, today);
    info!(
        count = dates.len(),
        daily_logs = %daily_logs.display(),
        "starting Rize sync"
    );

    let options = SyncOptions {
        sync_date: today,
        dry_run: args.dry_run,
    };
    let summary = run_sync(&client, settings, &dates, options).await;
    OutputStyle::print_summary(&summary);

    Ok(summary)
}
