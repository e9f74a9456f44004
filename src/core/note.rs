use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Settings;
use crate::utils::error::{AppError, AppResult};

/// Path of the daily note for `date`: `<vault>/<daily logs>/<YYYY-MM-DD>.md`.
pub fn note_path(settings: &Settings, date: NaiveDate) -> AppResult<PathBuf> {
    Ok(settings
        .daily_logs_dir()?
        .join(format!("{}.md", date.format("%Y-%m-%d"))))
}

/// Return the note path for `date`, creating an empty note and any missing
/// parent directories first.
pub fn locate_or_create(date: NaiveDate, settings: &Settings) -> AppResult<PathBuf> {
    let path = note_path(settings, date)?;
    if path.is_file() {
        debug!(path = %path.display(), "found existing daily note");
        return Ok(path);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| fs_error("create directory", parent, e))?;
    }
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|e| fs_error("create note", &path, e))?;

    info!(path = %path.display(), "created daily note");
    Ok(path)
}

pub fn read_note(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| fs_error("read note", path, e))
}

/// Note content if the file exists, otherwise an empty string. Never creates anything.
pub fn read_note_if_exists(path: &Path) -> AppResult<String> {
    if path.exists() {
        read_note(path)
    } else {
        Ok(String::new())
    }
}

pub fn write_note(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| fs_error("write note", path, e))
}

fn fs_error(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::Filesystem(format!("Failed to {} {}: {}", action, path.display(), err))
}
