//! Line-oriented frontmatter handling for daily notes.
//!
//! The block is kept as an ordered list of entries. Entries whose key is not
//! managed here are carried through as their original text, so unknown keys,
//! comments, nested YAML values and line endings survive a merge untouched.

use chrono::NaiveDate;

use crate::core::data::{DailyMetrics, round_hundredths};

pub const MARKER: &str = "---";

const BOM: char = '\u{feff}';

pub const KEY_WORK_HOURS: &str = "rize_work_hours";
pub const KEY_FOCUS_TIME: &str = "rize_focus_time";
pub const KEY_BREAK_TIME: &str = "rize_break_time";
pub const KEY_MEETING_TIME: &str = "rize_meeting_time";
pub const KEY_LAST_SYNC: &str = "rize_last_sync";

/// Keys owned by this tool, in the order they are written.
pub const MANAGED_KEYS: [&str; 5] = [
    KEY_WORK_HOURS,
    KEY_FOCUS_TIME,
    KEY_BREAK_TIME,
    KEY_MEETING_TIME,
    KEY_LAST_SYNC,
];

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    /// A `key: value` line plus any continuation lines that belong to it.
    Keyed { key: String, text: String },
    /// Lines that precede the first key (comments, blanks).
    Loose(String),
}

impl Entry {
    fn text(&self) -> &str {
        match self {
            Entry::Keyed { text, .. } | Entry::Loose(text) => text,
        }
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            Entry::Keyed { text, .. } | Entry::Loose(text) => text,
        }
    }
}

/// Ordered frontmatter entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<Entry>,
}

impl Frontmatter {
    fn parse(block: &str) -> Self {
        let mut entries: Vec<Entry> = Vec::new();
        for line in block.split_inclusive('\n') {
            match line_key(line) {
                Some(key) => entries.push(Entry::Keyed {
                    key: key.to_string(),
                    text: line.to_string(),
                }),
                None => match entries.last_mut() {
                    Some(last) => last.text_mut().push_str(line),
                    None => entries.push(Entry::Loose(line.to_string())),
                },
            }
        }
        Self { entries }
    }

    /// Keys in the order they appear.
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Keyed { key, .. } => Some(key.as_str()),
                Entry::Loose(_) => None,
            })
            .collect()
    }

    /// Inline value of the first occurrence of `key`, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Keyed { key: k, text } if k == key => {
                let first_line = text.lines().next().unwrap_or_default();
                first_line.split_once(':').map(|(_, value)| value.trim())
            }
            _ => None,
        })
    }

    /// Replace the first occurrence of `key` in place, dropping any duplicates,
    /// or append it when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        let line = format!("{}: {}\n", key, value);
        let mut seen = false;
        self.entries.retain_mut(|entry| match entry {
            Entry::Keyed { key: k, text } if k == key => {
                if seen {
                    false
                } else {
                    seen = true;
                    *text = line.clone();
                    true
                }
            }
            _ => true,
        });

        if !seen {
            if let Some(last) = self.entries.last_mut() {
                let text = last.text_mut();
                if !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            self.entries.push(Entry::Keyed {
                key: key.to_string(),
                text: line,
            });
        }
    }

    fn render_into(&self, out: &mut String) {
        for entry in &self.entries {
            out.push_str(entry.text());
        }
    }
}

/// A note split into its frontmatter block and body.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDocument {
    pub frontmatter: Frontmatter,
    body: String,
    had_frontmatter: bool,
    bom: bool,
}

impl NoteDocument {
    /// Split note content. Content without a terminated leading block is
    /// treated entirely as body. A leading byte-order mark is set aside and
    /// written back on render.
    pub fn parse(content: &str) -> Self {
        let (bom, content) = match content.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, content),
        };
        match split_block(content) {
            Some((block, body)) => Self {
                frontmatter: Frontmatter::parse(block),
                body: body.to_string(),
                had_frontmatter: true,
                bom,
            },
            None => Self {
                frontmatter: Frontmatter::default(),
                body: content.to_string(),
                had_frontmatter: false,
                bom,
            },
        }
    }

    pub fn has_frontmatter(&self) -> bool {
        self.had_frontmatter
    }

    /// Text following the frontmatter block as it was read.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        if self.bom {
            out.push(BOM);
        }
        out.push_str(MARKER);
        out.push('\n');
        self.frontmatter.render_into(&mut out);
        out.push_str(MARKER);
        out.push('\n');
        if !self.had_frontmatter && !self.body.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.body);
        out
    }
}

/// Managed key/value pairs for a set of metrics, serialized for the block.
pub fn managed_fields(metrics: &DailyMetrics, sync_date: NaiveDate) -> [(&'static str, String); 5] {
    [
        (KEY_WORK_HOURS, format_hours(metrics.work_hours)),
        (KEY_FOCUS_TIME, format_hours(metrics.focus_time)),
        (KEY_BREAK_TIME, format_hours(metrics.break_time)),
        (KEY_MEETING_TIME, format_hours(metrics.meeting_time)),
        (KEY_LAST_SYNC, format!("'{}'", sync_date.format("%Y-%m-%d"))),
    ]
}

/// Write the managed keys into `content`'s frontmatter, leaving every other
/// entry and the body unchanged.
pub fn merge_frontmatter(content: &str, metrics: &DailyMetrics, sync_date: NaiveDate) -> String {
    let mut document = NoteDocument::parse(content);
    for (key, value) in managed_fields(metrics, sync_date) {
        document.frontmatter.set(key, &value);
    }
    document.render()
}

/// Two-decimal rounding, printed in shortest form with at least one fractional digit.
pub fn format_hours(value: f64) -> String {
    let mut text = round_hundredths(value).to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Trailing whitespace after the dashes is allowed, as Obsidian does.
fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}

/// Returns `(block, body)` when `content` opens with a terminated marker pair.
fn split_block(content: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if !is_marker(first) || !first.ends_with('\n') {
        return None;
    }
    offset += first.len();
    let block_start = offset;

    for line in lines {
        if is_marker(line) {
            let block = &content[block_start..offset];
            let body = &content[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn line_key(line: &str) -> Option<&str> {
    let first = line.chars().next()?;
    if first.is_whitespace() || first == '#' || first == '-' {
        return None;
    }
    let (key, _) = line.split_once(':')?;
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}
