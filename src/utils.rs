//! Utility functions for file naming and suffix matching

use chrono::Utc;
use std::path::Path;

/// File suffix recognized as CSV (compared case-insensitively)
pub const CSV_SUFFIX: &str = ".csv";

/// Check whether a name or URL path ends in `.csv`, ignoring case
///
/// # Examples
///
/// ```
/// use ticket_csv::utils::has_csv_suffix;
///
/// assert!(has_csv_suffix("report.CSV"));
/// assert!(!has_csv_suffix("report.csv.txt"));
/// ```
#[must_use]
pub fn has_csv_suffix(name: &str) -> bool {
    name.len() >= CSV_SUFFIX.len()
        && name.is_char_boundary(name.len() - CSV_SUFFIX.len())
        && name[name.len() - CSV_SUFFIX.len()..].eq_ignore_ascii_case(CSV_SUFFIX)
}

/// Check whether a directory entry is a CSV file by name
#[must_use]
pub fn is_csv_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(has_csv_suffix)
}

/// Extract a usable filename from the last path segment of a URL
///
/// Returns `None` when the URL does not parse, the last segment is empty,
/// or the segment has no `.` in it.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    let last_segment = segments.next_back()?;
    if last_segment.is_empty() || !last_segment.contains('.') {
        return None;
    }
    Some(last_segment.to_string())
}

/// Synthesize a filename for a URL that does not carry one
///
/// Two fallbacks created in the same second share a name; the later download
/// overwrites the earlier one.
pub fn fallback_filename() -> String {
    format!("download_{}{}", Utc::now().timestamp(), CSV_SUFFIX)
}

/// Local filename for a downloaded link
pub fn local_filename(url: &str) -> String {
    filename_from_url(url).unwrap_or_else(fallback_filename)
}
