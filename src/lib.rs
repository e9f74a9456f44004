//! rize-sync - pull daily Rize metrics into Obsidian daily notes
//!
//! This library fetches work, focus, break and meeting totals from the Rize
//! API and merges them into the frontmatter of date-named notes in a vault.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod sync;
pub mod utils;

// Re-export the main types for easier use
pub use config::Settings;
pub use self::core::{
    data::{CategoryTotal, DailyMetrics, ProjectTotal},
    frontmatter::{MANAGED_KEYS, NoteDocument, merge_frontmatter},
    note::locate_or_create,
};
pub use sync::{MetricsClient, rize::RizeClient};
pub use utils::error::{AppError, AppResult};
