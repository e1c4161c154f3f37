//! Merging downloaded CSV files into one
//!
//! The first non-empty file supplies the header row. Every later file is
//! sniffed: a file that appears to start with a header loses its first row,
//! any other file contributes all of its rows. Unreadable files are logged and
//! skipped so one bad download never sinks the whole merge.

pub mod sniff;

use crate::activity_log::ActivityLog;
use crate::config::{MergeConfig, MergeOrder};
use crate::error::{AggregateError, Error, Result};
use crate::types::AggregateReport;
use crate::utils::is_csv_file;
use std::path::{Path, PathBuf};

type Row = Vec<String>;

/// Outcome of reading one input file
enum FileRows {
    Empty,
    Rows { rows: Vec<Row>, has_header: bool },
}

/// Merges every CSV file in a directory
pub struct Aggregator<'a> {
    config: MergeConfig,
    log: &'a ActivityLog,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator reporting to `log`
    pub fn new(config: &MergeConfig, log: &'a ActivityLog) -> Self {
        Self {
            config: config.clone(),
            log,
        }
    }

    /// Merge the CSV files in `raw_dir` into `output`
    ///
    /// Nothing is created when the directory holds no CSV files, or when every
    /// file is empty or unreadable.
    pub fn aggregate(&self, raw_dir: &Path, output: &Path) -> AggregateReport {
        let output_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let inputs = match self.list_inputs(raw_dir) {
            Ok(inputs) => inputs,
            Err(e) => {
                self.log.error(format!("AGGREGATION FAILED: {e}"));
                return AggregateReport::default();
            }
        };

        if inputs.is_empty() {
            self.log.info("No CSV files to aggregate.");
            return AggregateReport::default();
        }

        let mut report = AggregateReport::default();
        let mut header: Option<Row> = None;
        let mut data_rows: Vec<Row> = Vec::new();

        for path in &inputs {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.read_file(path, &file) {
                Ok(FileRows::Empty) => {
                    report.files_skipped += 1;
                    self.log.info(format!("{file} - SKIPPED (empty)"));
                }
                Ok(FileRows::Rows { mut rows, has_header }) => {
                    let contributed = if header.is_none() {
                        let rest = rows.split_off(1);
                        header = rows.pop();
                        rest
                    } else if has_header {
                        rows.split_off(1)
                    } else {
                        rows
                    };

                    let count = contributed.len();
                    tracing::debug!(file = %file, rows = count, has_header, "merging file");
                    data_rows.extend(contributed);
                    report.files_added += 1;
                    self.log.info(format!("{file} - ADDED ({count} rows)"));
                }
                Err(e) => {
                    report.files_failed += 1;
                    let reason = match &e {
                        Error::Aggregate(AggregateError::Read { reason, .. }) => reason.clone(),
                        other => other.to_string(),
                    };
                    self.log.info(format!("{file} - FAILED ({reason})"));
                }
            }
        }

        let Some(header) = header else {
            self.log
                .info(format!("FINAL: {output_name} - NOT CREATED (0 rows)"));
            return report;
        };

        if let Err(e) = write_combined(output, &header, &data_rows) {
            self.log.error(format!("AGGREGATION FAILED: {e}"));
            return report;
        }

        report.total_rows = data_rows.len() + 1;
        report.output = Some(output.to_path_buf());
        self.log.info(format!(
            "FINAL: {output_name} - CREATED ({} rows)",
            report.total_rows
        ));
        report
    }

    /// CSV files in `raw_dir`, in the configured order
    pub fn list_inputs(&self, raw_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();
        for entry in std::fs::read_dir(raw_dir)? {
            let path = entry?.path();
            if path.is_file() && is_csv_file(&path) {
                inputs.push(path);
            }
        }
        if self.config.order == MergeOrder::Name {
            inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        Ok(inputs)
    }

    fn read_file(&self, path: &Path, file: &str) -> Result<FileRows> {
        let read_error = |reason: String| AggregateError::Read {
            file: file.to_string(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| read_error(e.to_string()))?;
        let text = std::str::from_utf8(&bytes).map_err(|e| read_error(e.to_string()))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect::<Row>());
        }

        if rows.is_empty() {
            return Ok(FileRows::Empty);
        }

        let sample = &bytes[..bytes.len().min(self.config.sniff_sample_bytes)];
        let has_header = sniff::has_header(sample).unwrap_or(false);
        Ok(FileRows::Rows { rows, has_header })
    }
}

/// Write the header followed by every data row, CRLF terminated
fn write_combined(output: &Path, header: &Row, rows: &[Row]) -> Result<()> {
    let write_error = |reason: String| AggregateError::Write {
        path: output.to_path_buf(),
        reason,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_path(output)
        .map_err(|e| write_error(e.to_string()))?;

    writer
        .write_record(header)
        .map_err(|e| write_error(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| write_error(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_error(e.to_string()))?;
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADERED_A: &str = "id,name,amount\n1,alice,10.5\n2,bob,3.25\n";
    const HEADERED_B: &str = "id,name,amount\n3,carol,7.75\n4,dave,1.5\n5,erin,2.0\n";
    const PLAIN: &str = "6,frank,4.5\n7,grace,8.25\n8,heidi,9.0\n";

    struct Harness {
        _temp: TempDir,
        raw_dir: PathBuf,
        output: PathBuf,
        log: ActivityLog,
    }

    impl Harness {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let raw_dir = temp.path().join("raw_downloads");
            std::fs::create_dir_all(&raw_dir).unwrap();
            let output = temp.path().join("combined_test.csv");
            let log =
                ActivityLog::open("AGGREGATE", &temp.path().join("aggregation.log")).unwrap();
            Self {
                _temp: temp,
                raw_dir,
                output,
                log,
            }
        }

        fn write(&self, name: &str, content: impl AsRef<[u8]>) {
            std::fs::write(self.raw_dir.join(name), content).unwrap();
        }

        fn run(&self) -> AggregateReport {
            let config = MergeConfig {
                order: MergeOrder::Name,
                ..MergeConfig::default()
            };
            Aggregator::new(&config, &self.log).aggregate(&self.raw_dir, &self.output)
        }

        fn output_rows(&self) -> Vec<Vec<String>> {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&self.output)
                .unwrap();
            reader
                .records()
                .map(|r| r.unwrap().iter().map(str::to_string).collect())
                .collect()
        }

        fn log_lines(&self) -> Vec<String> {
            std::fs::read_to_string(self.log.path())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn headered_files_share_one_header() {
        let h = Harness::new();
        h.write("a.csv", HEADERED_A);
        h.write("b.csv", HEADERED_B);

        let report = h.run();

        // 1 header + (3 - 1) + (4 - 1)
        assert_eq!(report.total_rows, 6);
        assert_eq!(report.files_added, 2);
        assert_eq!(report.output.as_deref(), Some(h.output.as_path()));

        let rows = h.output_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], vec!["id", "name", "amount"]);
        assert_eq!(
            rows.iter().filter(|r| r[0] == "id").count(),
            1,
            "header must appear once"
        );
        assert_eq!(rows[5], vec!["5", "erin", "2.0"]);
    }

    #[test]
    fn headerless_file_keeps_all_rows() {
        let h = Harness::new();
        h.write("a_headered.csv", HEADERED_A);
        h.write("b_plain.csv", PLAIN);

        let report = h.run();

        // header + (M - 1) + M with M = 3
        assert_eq!(report.total_rows, 1 + 2 + 3);
        let rows = h.output_rows();
        assert_eq!(rows[0], vec!["id", "name", "amount"]);
        assert_eq!(rows[3], vec!["6", "frank", "4.5"]);
    }

    #[test]
    fn first_file_row_is_header_even_when_not_sniffed_as_one() {
        let h = Harness::new();
        h.write("a_plain.csv", PLAIN);

        let report = h.run();

        assert_eq!(report.total_rows, 3);
        assert_eq!(h.output_rows()[0], vec!["6", "frank", "4.5"]);
        assert_eq!(
            h.log_lines(),
            vec![
                "a_plain.csv - ADDED (2 rows)".to_string(),
                "FINAL: combined_test.csv - CREATED (3 rows)".to_string(),
            ]
        );
    }

    #[test]
    fn plain_first_then_headered_drops_the_later_header() {
        let h = Harness::new();
        h.write("a_plain.csv", PLAIN);
        h.write("b_headered.csv", HEADERED_B);

        let report = h.run();

        // plain file's first row becomes the header, the headered file loses its own
        assert_eq!(report.total_rows, 1 + 2 + 3);
        let rows = h.output_rows();
        assert_eq!(rows[0], vec!["6", "frank", "4.5"]);
        assert_eq!(rows[3], vec!["3", "carol", "7.75"]);
        assert!(!rows.iter().any(|r| r[0] == "id"));
        assert_eq!(
            h.log_lines(),
            vec![
                "a_plain.csv - ADDED (2 rows)".to_string(),
                "b_headered.csv - ADDED (3 rows)".to_string(),
                "FINAL: combined_test.csv - CREATED (6 rows)".to_string(),
            ]
        );
    }

    #[test]
    fn empty_file_is_skipped_without_shifting_counts() {
        let h = Harness::new();
        h.write("a.csv", HEADERED_A);
        h.write("b_empty.csv", "");
        h.write("c.csv", HEADERED_B);

        let report = h.run();

        assert_eq!(report.total_rows, 6);
        assert_eq!(report.files_added, 2);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(
            h.log_lines(),
            vec![
                "a.csv - ADDED (2 rows)".to_string(),
                "b_empty.csv - SKIPPED (empty)".to_string(),
                "c.csv - ADDED (3 rows)".to_string(),
                "FINAL: combined_test.csv - CREATED (6 rows)".to_string(),
            ]
        );
    }

    #[test]
    fn leading_empty_file_does_not_claim_the_header() {
        let h = Harness::new();
        h.write("a_empty.csv", "");
        h.write("b.csv", HEADERED_B);

        let report = h.run();

        assert_eq!(report.total_rows, 4);
        assert_eq!(h.output_rows()[0], vec!["id", "name", "amount"]);
    }

    #[test]
    fn unreadable_file_is_logged_and_others_merge() {
        let h = Harness::new();
        h.write("a.csv", HEADERED_A);
        h.write("b_binary.csv", [0xff, 0xfe, 0x00, 0x81, b'\n']);

        let report = h.run();

        assert_eq!(report.files_failed, 1);
        assert_eq!(report.total_rows, 3);
        let lines = h.log_lines();
        assert!(
            lines[1].starts_with("b_binary.csv - FAILED ("),
            "log was {lines:?}"
        );
        assert_eq!(lines[2], "FINAL: combined_test.csv - CREATED (3 rows)");
    }

    #[test]
    fn no_input_files_creates_nothing() {
        let h = Harness::new();
        h.write("notes.txt", "not a csv");

        let report = h.run();

        assert_eq!(report, AggregateReport::default());
        assert!(!h.output.exists());
        assert_eq!(h.log_lines(), vec!["No CSV files to aggregate.".to_string()]);
    }

    #[test]
    fn only_empty_files_creates_nothing() {
        let h = Harness::new();
        h.write("a.csv", "");
        h.write("b.csv", "");

        let report = h.run();

        assert!(report.output.is_none());
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.files_skipped, 2);
        assert!(!h.output.exists());
        assert_eq!(
            h.log_lines().last().unwrap(),
            "FINAL: combined_test.csv - NOT CREATED (0 rows)"
        );
    }

    #[test]
    fn uppercase_suffix_is_included() {
        let h = Harness::new();
        h.write("EXPORT.CSV", HEADERED_A);

        let report = h.run();
        assert_eq!(report.files_added, 1);
    }

    #[test]
    fn output_is_crlf_terminated_and_requoted() {
        let h = Harness::new();
        h.write(
            "a.csv",
            "ticket,note\n\"10\",\"hello, world\"\n\"11\",\"second, note\"\n",
        );

        h.run();

        let raw = std::fs::read_to_string(&h.output).unwrap();
        assert_eq!(
            raw,
            "ticket,note\r\n10,\"hello, world\"\r\n11,\"second, note\"\r\n"
        );
    }

    #[test]
    fn name_order_is_sorted() {
        let h = Harness::new();
        h.write("b.csv", HEADERED_B);
        h.write("a.csv", HEADERED_A);
        h.write("c.csv", PLAIN);

        let config = MergeConfig {
            order: MergeOrder::Name,
            ..MergeConfig::default()
        };
        let aggregator = Aggregator::new(&config, &h.log);
        let names: Vec<String> = aggregator
            .list_inputs(&h.raw_dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.csv"]);
    }

    #[test]
    fn directory_order_lists_every_csv() {
        let h = Harness::new();
        h.write("b.csv", HEADERED_B);
        h.write("a.csv", HEADERED_A);
        h.write("skip.json", "{}");
        std::fs::create_dir(h.raw_dir.join("nested.csv")).unwrap();

        let aggregator = Aggregator::new(&MergeConfig::default(), &h.log);
        let mut names: Vec<String> = aggregator
            .list_inputs(&h.raw_dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn missing_raw_dir_is_logged() {
        let h = Harness::new();
        let aggregator = Aggregator::new(&MergeConfig::default(), &h.log);

        let report = aggregator.aggregate(&h.raw_dir.join("missing"), &h.output);

        assert!(report.output.is_none());
        assert!(h.log_lines()[0].starts_with("AGGREGATION FAILED: "));
    }
}
