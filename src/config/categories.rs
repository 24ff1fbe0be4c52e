//! Category (stock symbol) loading.

use anyhow::Context;
use std::path::Path;

/// Load category values from a CLI argument.
///
/// The input is read as a comma-separated list when it contains a comma,
/// as a file with one value per line when it names an existing file, and
/// as a single value otherwise. Values are trimmed and upper-cased; blank
/// entries are skipped.
pub fn load_categories(input: &str) -> anyhow::Result<Vec<String>> {
    if input.contains(',') {
        return Ok(normalize(input.split(',')));
    }

    let path = Path::new(input.trim());
    if path.is_file() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read categories file '{}'", path.display()))?;
        return Ok(normalize(content.lines()));
    }

    Ok(normalize(std::iter::once(input)))
}

fn normalize<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Short human-readable preview of a category list.
pub fn preview(categories: &[String]) -> String {
    const SHOWN: usize = 5;
    let head = categories
        .iter()
        .take(SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if categories.len() > SHOWN {
        format!("{head}...")
    } else {
        head
    }
}
