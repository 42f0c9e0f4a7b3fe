//! Saving itineraries as Markdown files

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::{debug, info};

use crate::domain::Itinerary;

/// Content type offered alongside the saved file
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// File name for a destination's itinerary, e.g. `itinerary_New_York.md`
///
/// Whitespace becomes `_`; path separators and control characters are
/// dropped so the name can never leave the output directory.
pub fn download_filename(destination: &str) -> String {
    let sanitized: String = destination
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            '/' | '\\' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    format!("itinerary_{}.md", sanitized)
}

/// Write the itinerary into `dir`, creating the directory if needed
pub fn save_itinerary(dir: &Path, destination: &str, itinerary: &Itinerary) -> Result<PathBuf> {
    debug!(dir = %dir.display(), %destination, "save_itinerary: called");
    fs::create_dir_all(dir).context(format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(download_filename(destination));
    fs::write(&path, itinerary.as_str()).context(format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = itinerary.len(), "Saved itinerary");
    Ok(path)
}
