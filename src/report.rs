use crate::record::{DiffRecord, DiffStatus, Difference, FileRecord};
use serde::Serialize;
use std::borrow::Cow;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per entry, followed by a summary
    Text,
    /// A single JSON document
    Json,
}

/// Per-status counts over every compared path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl Summary {
    pub fn from_records(records: &[DiffRecord]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            match record.status {
                DiffStatus::Added => summary.added += 1,
                DiffStatus::Deleted => summary.deleted += 1,
                DiffStatus::Modified => summary.modified += 1,
                DiffStatus::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified + self.unchanged
    }

    pub fn has_differences(&self) -> bool {
        self.added + self.deleted + self.modified > 0
    }
}

pub fn render(
    records: &[DiffRecord],
    format: OutputFormat,
    show_unchanged: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(records, show_unchanged)),
        OutputFormat::Json => render_json(records, show_unchanged),
    }
}

fn is_displayed(record: &DiffRecord, show_unchanged: bool) -> bool {
    show_unchanged || record.status != DiffStatus::Unchanged
}

fn status_code(status: DiffStatus) -> &'static str {
    match status {
        DiffStatus::Added => "A",
        DiffStatus::Deleted => "D",
        DiffStatus::Modified => "M",
        DiffStatus::Unchanged => ".",
    }
}

pub fn render_text(records: &[DiffRecord], show_unchanged: bool) -> String {
    let mut out = String::new();

    for record in records.iter().filter(|r| is_displayed(r, show_unchanged)) {
        out.push_str(&format!("{:<2} {}\n", status_code(record.status), record.path));
        for line in format_difference_lines(record) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    if !out.is_empty() {
        out.push('\n');
    }

    let summary = Summary::from_records(records);
    out.push_str(&format!(
        "{} added, {} deleted, {} modified, {} unchanged ({} total)\n",
        summary.added,
        summary.deleted,
        summary.modified,
        summary.unchanged,
        summary.total()
    ));

    out
}

fn format_difference_lines(record: &DiffRecord) -> Vec<String> {
    record
        .differences
        .iter()
        .map(|difference| {
            let (left, right) = display_values(difference);
            format!("   {}: {} -> {}", difference.field(), left, right)
        })
        .collect()
}

fn display_values(difference: &Difference) -> (String, String) {
    match difference {
        Difference::Kind { left_is_directory } => {
            let kind = |is_dir: bool| if is_dir { "directory" } else { "file" };
            (
                kind(*left_is_directory).to_string(),
                kind(!*left_is_directory).to_string(),
            )
        }
        Difference::Size { left, right } => (format_size(*left), format_size(*right)),
        Difference::ModifiedAt { left, right } => (format_mtime(*left), format_mtime(*right)),
        Difference::Permissions { left, right } => (left.to_string(), right.to_string()),
    }
}

/// Exact, machine-friendly values for the JSON report.
fn raw_values(difference: &Difference) -> (String, String) {
    match difference {
        Difference::Kind { .. } => display_values(difference),
        Difference::Size { left, right } => (left.to_string(), right.to_string()),
        Difference::ModifiedAt { left, right } => (format_rfc3339(*left), format_rfc3339(*right)),
        Difference::Permissions { left, right } => (format!("{left:04o}"), format!("{right:04o}")),
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn format_mtime(time: SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn format_rfc3339(time: SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    records: Vec<JsonRecord<'a>>,
    summary: Summary,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    path: &'a str,
    status: DiffStatus,
    left: Option<JsonEntry<'a>>,
    right: Option<JsonEntry<'a>>,
    differences: Vec<JsonDifference>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    absolute_path: Cow<'a, str>,
    size: u64,
    modified_at: String,
    is_directory: bool,
    permissions: String,
}

#[derive(Serialize)]
struct JsonDifference {
    field: &'static str,
    left: String,
    right: String,
}

impl<'a> From<&'a FileRecord> for JsonEntry<'a> {
    fn from(record: &'a FileRecord) -> Self {
        JsonEntry {
            absolute_path: record.absolute_path.to_string_lossy(),
            size: record.size,
            modified_at: format_rfc3339(record.modified_at),
            is_directory: record.is_directory,
            permissions: format!("{:04o}", record.permissions),
        }
    }
}

pub fn render_json(records: &[DiffRecord], show_unchanged: bool) -> serde_json::Result<String> {
    let report = JsonReport {
        records: records
            .iter()
            .filter(|r| is_displayed(r, show_unchanged))
            .map(|record| JsonRecord {
                path: &record.path,
                status: record.status,
                left: record.left.as_ref().map(JsonEntry::from),
                right: record.right.as_ref().map(JsonEntry::from),
                differences: record
                    .differences
                    .iter()
                    .map(|difference| {
                        let (left, right) = raw_values(difference);
                        JsonDifference {
                            field: difference.field(),
                            left,
                            right,
                        }
                    })
                    .collect(),
            })
            .collect(),
        summary: Summary::from_records(records),
    };

    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
