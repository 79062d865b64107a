use crate::error::{ExportError, ExportResult};

const APP_MEDIA_KEY: &str = "appMedia:";

/// One `appMedia` entry of the app manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    pub title: String,
    pub description: String,
    pub location: String,
}

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

impl MediaEntry {
    pub fn render(&self) -> String {
        format!(
            "  - title: {}\n    description: {}\n    type: \"image\"\n    location: {}\n",
            quoted(&self.title),
            quoted(&self.description),
            quoted(&self.location)
        )
    }
}

/// Insert `entry` into the `appMedia` list of a manifest.
///
/// The entry goes after the existing list items, before the first blank line
/// or the next top-level key following `appMedia:`.
pub fn insert_media_entry(manifest: &str, entry: &MediaEntry) -> ExportResult<String> {
    let lines: Vec<&str> = manifest.split_inclusive('\n').collect();

    let key_index = lines
        .iter()
        .position(|line| line.trim() == APP_MEDIA_KEY)
        .ok_or_else(|| {
            ExportError::InvalidInput("appMedia field not found in the manifest".to_string())
        })?;

    let mut insert_at = key_index + 1;
    while insert_at < lines.len() {
        let line = lines[insert_at];
        let top_level = !line.starts_with(' ') && !line.starts_with('\t');

        if line.trim().is_empty() || (top_level && !line.starts_with('-')) {
            break;
        }
        insert_at += 1;
    }

    let mut updated = String::with_capacity(manifest.len() + 128);
    for line in &lines[..insert_at] {
        updated.push_str(line);
    }
    if !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&entry.render());
    for line in &lines[insert_at..] {
        updated.push_str(line);
    }

    Ok(updated)
}
