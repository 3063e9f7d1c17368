use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::core::error::CheckError;
use crate::core::types::{CheckRecord, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Markdown,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    /// At least one platform reads available.
    AvailableAny,
    /// At least one platform reads taken.
    TakenAny,
}

impl ResultFilter {
    pub fn keeps(&self, record: &CheckRecord) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::AvailableAny => record.any_available(),
            ResultFilter::TakenAny => record.any_taken(),
        }
    }
}

pub fn apply_filter(records: Vec<CheckRecord>, filter: ResultFilter) -> Vec<CheckRecord> {
    records.into_iter().filter(|r| filter.keeps(r)).collect()
}

#[derive(Serialize)]
struct ResultsEnvelope<'a> {
    results: &'a [CheckRecord],
}

pub fn render_records(
    records: &[CheckRecord],
    platforms: &[Platform],
    format: OutputFormat,
) -> Result<String, CheckError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&ResultsEnvelope { results: records })
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| CheckError::Internal(e.to_string())),
        OutputFormat::Jsonl => render_jsonl(records),
        OutputFormat::Markdown => Ok(render_markdown(records, platforms)),
        OutputFormat::Csv => Ok(render_csv(records, platforms)),
    }
}

pub fn write_records(
    records: &[CheckRecord],
    platforms: &[Platform],
    format: OutputFormat,
    path: &Path,
) -> Result<(), CheckError> {
    let rendered = render_records(records, platforms, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, rendered)?;
    Ok(())
}

fn render_jsonl(records: &[CheckRecord]) -> Result<String, CheckError> {
    let mut lines = String::new();
    for record in records {
        let json = serde_json::to_string(record).map_err(|e| CheckError::Internal(e.to_string()))?;
        lines.push_str(&json);
        lines.push('\n');
    }
    Ok(lines)
}

fn render_markdown(records: &[CheckRecord], platforms: &[Platform]) -> String {
    let mut out = String::from("| Name |");
    for p in platforms {
        out.push_str(&format!(" {} |", capitalize(p.as_str())));
    }
    out.push_str("\n|---|");
    out.push_str(&"---|".repeat(platforms.len()));
    out.push('\n');
    for record in records {
        out.push_str(&format!("| {} |", record.name.replace('|', "\\|")));
        for p in platforms {
            let cell = if record.get(*p).unwrap_or(false) {
                "Yes"
            } else {
                "No"
            };
            out.push_str(&format!(" {cell} |"));
        }
        out.push('\n');
    }
    out
}

fn render_csv(records: &[CheckRecord], platforms: &[Platform]) -> String {
    let mut out = String::from("name");
    for p in platforms {
        out.push(',');
        out.push_str(p.as_str());
    }
    out.push('\n');
    for record in records {
        out.push_str(&csv_field(&record.name));
        for p in platforms {
            out.push(',');
            out.push_str(if record.get(*p).unwrap_or(false) {
                "true"
            } else {
                "false"
            });
        }
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
