//! Metric values produced by the remote service and consumed by the note writer.

use chrono::NaiveDate;

/// Seconds in one hour; the service reports every duration in seconds.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Aggregated time-tracking metrics for one calendar day, in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub work_hours: f64,
    pub focus_time: f64,
    pub break_time: f64,
    pub meeting_time: f64,
}

impl DailyMetrics {
    /// Build metrics from raw second totals, converting each to rounded hours.
    pub fn from_seconds(date: NaiveDate, work: f64, focus: f64, breaks: f64, meetings: f64) -> Self {
        Self {
            date,
            work_hours: seconds_to_hours(work),
            focus_time: seconds_to_hours(focus),
            break_time: seconds_to_hours(breaks),
            meeting_time: seconds_to_hours(meetings),
        }
    }
}

/// Time spent on a single project during one day.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTotal {
    pub name: String,
    pub seconds: u64,
}

/// Time spent in a single Rize category during one day.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub seconds: u64,
}

/// Round to two decimal places, halves away from zero.
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn seconds_to_hours(seconds: f64) -> f64 {
    round_hundredths(seconds / SECONDS_PER_HOUR)
}

/// Format a second count as `Xh Ym`.
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}
