use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Split newline-delimited text or CSV into names, keeping the first column.
///
/// Blank rows are dropped, as is a leading `name` header.
pub fn parse_names(content: &str) -> Vec<String> {
    let mut names: Vec<String> = content
        .lines()
        .map(first_column)
        .filter(|s| !s.is_empty())
        .collect();
    if names
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case("name"))
    {
        names.remove(0);
    }
    names
}

pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read names from {}", path.display()))?;
    Ok(parse_names(&content))
}

fn first_column(line: &str) -> String {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('"') {
        // quoted field; "" is an escaped quote
        let mut out = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    out.push('"');
                    chars.next();
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        return out.trim().to_string();
    }
    line.split(',').next().unwrap_or("").trim().to_string()
}
