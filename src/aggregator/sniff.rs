//! Header-row detection for CSV samples
//!
//! The candidate header is the first row. Up to [`MAX_ROWS_CHECKED`] following
//! rows with the same width are classified cell by cell; a column whose kind
//! changes between rows says nothing and is dropped. Each surviving column then
//! votes on whether the first row looks different from the data below it.

/// Rows after the candidate header that are compared
pub const MAX_ROWS_CHECKED: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellKind {
    Integer,
    Float,
    Text(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Unseen,
    Consistent(CellKind),
    Dropped,
}

fn classify(cell: &str) -> CellKind {
    let trimmed = cell.trim();
    if trimmed.parse::<i128>().is_ok() {
        CellKind::Integer
    } else if trimmed.parse::<f64>().is_ok() {
        CellKind::Float
    } else {
        CellKind::Text(cell.chars().count())
    }
}

/// Parse the sample into rows, stopping at the first malformed record
fn sample_rows(sample: &[u8]) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(sample);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let Ok(record) = record else { break };
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    rows
}

/// Guess whether `sample` starts with a header row
///
/// Returns `None` when the sample gives nothing to compare: no rows, no data
/// row as wide as the first row, or no column with a consistent kind.
pub fn has_header(sample: &[u8]) -> Option<bool> {
    let rows = sample_rows(sample);
    let (header, data) = rows.split_first()?;
    let width = header.len();

    let mut columns = vec![Column::Unseen; width];
    let mut compared = 0;

    for row in data.iter().take(MAX_ROWS_CHECKED) {
        if row.len() != width {
            continue;
        }
        compared += 1;
        for (column, cell) in columns.iter_mut().zip(row) {
            let kind = classify(cell);
            *column = match *column {
                Column::Unseen => Column::Consistent(kind),
                Column::Consistent(seen) if seen == kind => Column::Consistent(seen),
                _ => Column::Dropped,
            };
        }
    }

    if compared == 0 {
        return None;
    }

    let mut votes: i64 = 0;
    let mut voters = 0;
    for (column, cell) in columns.iter().zip(header) {
        let Column::Consistent(kind) = column else {
            continue;
        };
        voters += 1;
        let looks_like_data = match kind {
            CellKind::Text(len) => cell.chars().count() == *len,
            CellKind::Integer => cell.trim().parse::<i128>().is_ok(),
            CellKind::Float => cell.trim().parse::<f64>().is_ok(),
        };
        votes += if looks_like_data { -1 } else { 1 };
    }

    if voters == 0 {
        return None;
    }
    Some(votes > 0)
}
