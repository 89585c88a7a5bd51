use crate::error::{ProfilingError, Result};
use crate::types::{ColumnStats, DatasetReport};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const OVERALL_HEADER: &str = "==== OVERALL ====";

/// Render a report as text.
///
/// The output depends only on the report contents, so equal reports render
/// to identical bytes regardless of backend or run.
pub fn render_report(report: &DatasetReport) -> String {
    let mut out = String::new();

    out.push_str(OVERALL_HEADER);
    out.push('\n');
    render_columns(&mut out, &report.overall);

    for group in &report.groups {
        out.push('\n');
        let _ = writeln!(out, "==== GROUP: {} ====", group.label());
        render_columns(&mut out, &group.columns);
    }

    out
}

fn render_columns(out: &mut String, columns: &[ColumnStats]) {
    for column in columns {
        let _ = writeln!(out, "{}:", column.column);
        for (key, value) in column.stats.fields() {
            let _ = writeln!(out, "  {}: {}", key, value);
        }
    }
}

/// Writes rendered reports below an output directory.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `report` and write it to `path`, creating the output directory
    /// if needed. Any existing file at `path` is replaced.
    ///
    /// The text goes to a temporary file next to `path` which is renamed into
    /// place once complete, so a failed write never leaves a partial report.
    pub fn write(&self, report: &DatasetReport, path: &Path) -> Result<()> {
        let write_failed = |e: std::io::Error| ProfilingError::ReportWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.output_dir).map_err(write_failed)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_failed)?;

        let content = render_report(report);
        debug!("Rendered {} bytes for {}", content.len(), report.source);

        let mut staged = NamedTempFile::new_in(dir).map_err(write_failed)?;
        staged.write_all(content.as_bytes()).map_err(write_failed)?;
        staged.persist(path).map_err(|e| write_failed(e.error))?;

        info!("Report saved: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CategoricalStats, ColumnClassification, ColumnKind, GroupKey, GroupReport, NumericStats,
        SummaryStats,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn numeric(count: usize, mean: f64, min: f64, max: f64, std: f64) -> SummaryStats {
        SummaryStats::Numeric(NumericStats {
            count,
            mean,
            min,
            max,
            std,
        })
    }

    fn sample_report() -> DatasetReport {
        let mut classification = ColumnClassification::default();
        classification.push("id", ColumnKind::Numeric);
        classification.push("tag", ColumnKind::Categorical);

        DatasetReport {
            source: "sample.csv".to_string(),
            row_count: 3,
            classification,
            overall: vec![
                ColumnStats {
                    column: "id".to_string(),
                    stats: numeric(3, 4.0 / 3.0, 1.0, 2.0, 0.5773502691896257),
                },
                ColumnStats {
                    column: "tag".to_string(),
                    stats: SummaryStats::Categorical(CategoricalStats {
                        count: 2,
                        unique: 1,
                        mode: "x".to_string(),
                        mode_count: 2,
                    }),
                },
            ],
            groups: vec![GroupReport {
                key: GroupKey::new(["id"]).unwrap(),
                key_tuple: vec!["1".to_string()],
                row_count: 2,
                columns: vec![
                    ColumnStats {
                        column: "id".to_string(),
                        stats: numeric(2, 1.0, 1.0, 1.0, 0.0),
                    },
                    ColumnStats {
                        column: "tag".to_string(),
                        stats: SummaryStats::Empty,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_render_layout() {
        let expected = "\
==== OVERALL ====
id:
  count: 3
  mean: 1.3333333333333333
  min: 1.0
  max: 2.0
  std: 0.5773502691896257
tag:
  count: 2
  unique: 1
  mode: x
  mode_count: 2

==== GROUP: [id] = [1] ====
id:
  count: 2
  mean: 1.0
  min: 1.0
  max: 1.0
  std: 0.0
tag:
";
        assert_eq!(render_report(&sample_report()), expected);
    }

    #[test]
    fn test_render_without_groups() {
        let mut report = sample_report();
        report.groups.clear();
        let text = render_report(&report);

        assert!(text.starts_with("==== OVERALL ====\n"));
        assert!(!text.contains("GROUP"));
    }

    #[test]
    fn test_render_empty_dataset() {
        let report = DatasetReport {
            source: "empty.csv".to_string(),
            row_count: 0,
            classification: ColumnClassification::default(),
            overall: Vec::new(),
            groups: Vec::new(),
        };
        assert_eq!(render_report(&report), "==== OVERALL ====\n");
    }

    #[test]
    fn test_write_creates_output_dir() {
        let temp = TempDir::new().unwrap();
        let output_dir = temp.path().join("nested").join("reports");
        let writer = ReportWriter::new(&output_dir);
        let path = output_dir.join("sample_stats.txt");

        writer.write(&sample_report(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&sample_report()));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        // a regular file where the output directory should be
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let writer = ReportWriter::new(&blocker);
        let err = writer
            .write(&sample_report(), &blocker.join("sample_stats.txt"))
            .unwrap_err();
        assert_eq!(err.error_code(), "REPORT_WRITE_FAILED");
    }

    #[test]
    fn test_write_replaces_existing_report() {
        let temp = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp.path());
        let path = temp.path().join("sample_stats.txt");
        fs::write(&path, "stale").unwrap();

        writer.write(&sample_report(), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), render_report(&sample_report()));
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let writer = ReportWriter::new(temp.path());
        // a directory occupies the report path, so the final rename fails
        let path = temp.path().join("sample_stats.txt");
        fs::create_dir(&path).unwrap();

        let err = writer.write(&sample_report(), &path).unwrap_err();
        assert_eq!(err.error_code(), "REPORT_WRITE_FAILED");

        let entries: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries, vec![path.clone()]);
        assert!(path.is_dir());
        assert_eq!(fs::read_dir(&path).unwrap().count(), 0);
    }
}
