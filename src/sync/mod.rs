pub mod rize;

use crate::core::data::{CategoryTotal, DailyMetrics, ProjectTotal};
use crate::utils::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of daily time-tracking aggregates.
#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Work, focus, break and meeting totals for one calendar day.
    async fn fetch_metrics(&self, date: NaiveDate) -> AppResult<DailyMetrics>;

    /// Time per Rize category for one calendar day, largest first.
    async fn fetch_categories(&self, date: NaiveDate) -> AppResult<Vec<CategoryTotal>>;

    /// Time per project for one calendar day, largest first.
    async fn fetch_projects(&self, date: NaiveDate) -> AppResult<Vec<ProjectTotal>>;
}
