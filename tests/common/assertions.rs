//! Custom assertions over run folders

use std::path::Path;

/// Non-empty lines of a log file
pub fn log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rows of a CSV file, read without header handling
pub fn csv_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => panic!("cannot open {}: {}", path.display(), e),
    };
    reader
        .records()
        .map(|r| match r {
            Ok(record) => record.iter().map(str::to_string).collect(),
            Err(e) => panic!("bad record in {}: {}", path.display(), e),
        })
        .collect()
}

/// Number of entries in a directory
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
