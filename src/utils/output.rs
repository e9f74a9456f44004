use colored::*;
use chrono::NaiveDate;
use crate::core::data::{CategoryTotal, DailyMetrics, ProjectTotal, format_duration};
use crate::commands::fetch::RunSummary;

pub struct OutputStyle;

impl OutputStyle {
    pub fn date(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn value(text: &str) -> ColoredString {
        text.bright_green()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>14}: {}", Self::label(label), color_fn(value));
    }

    pub fn print_metrics(metrics: &DailyMetrics) {
        println!("📅 {}", Self::date(&metrics.date.to_string()));
        Self::print_field_colored("Work hours", &format!("{:.2}", metrics.work_hours), Self::value);
        Self::print_field_colored("Focus time", &format!("{:.2}", metrics.focus_time), Self::value);
        Self::print_field_colored("Break time", &format!("{:.2}", metrics.break_time), Self::value);
        Self::print_field_colored("Meeting time", &format!("{:.2}", metrics.meeting_time), Self::value);
    }

    pub fn print_projects(date: NaiveDate, projects: &[ProjectTotal], limit: usize) {
        Self::print_header(&format!("📁 Top projects for {}", date));
        let rows = projects.iter().map(|p| (p.name.as_str(), p.seconds));
        Self::print_time_rows(rows.take(limit), "No project time recorded");
    }

    pub fn print_categories(date: NaiveDate, categories: &[CategoryTotal], limit: usize) {
        Self::print_header(&format!("🏷️  Top categories for {}", date));
        let rows = categories.iter().map(|c| (c.name.as_str(), c.seconds));
        Self::print_time_rows(rows.take(limit), "No category time recorded");
    }

    fn print_time_rows<'a>(rows: impl Iterator<Item = (&'a str, u64)>, empty: &str) {
        let mut printed = false;
        for (name, seconds) in rows {
            println!("  {:<32} {}", Self::header(name), Self::info(&format_duration(seconds)));
            printed = true;
        }
        if !printed {
            println!("{}", Self::muted(empty));
        }
    }

    pub fn print_summary(summary: &RunSummary) {
        println!();
        Self::print_header("🔄 Sync summary");
        Self::print_field_colored("Succeeded", &summary.succeeded.len().to_string(), Self::success);
        if !summary.failed.is_empty() {
            let dates: Vec<String> = summary.failed.iter().map(|d| d.to_string()).collect();
            Self::print_field_colored(
                "Failed",
                &format!("{} ({})", dates.len(), dates.join(", ")),
                Self::error,
            );
        }
        if !summary.skipped.is_empty() {
            let dates: Vec<String> = summary.skipped.iter().map(|d| d.to_string()).collect();
            Self::print_field_colored(
                "Skipped",
                &format!("{} ({})", dates.len(), dates.join(", ")),
                Self::warning,
            );
        }
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}
