use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::changelog::{self, ChangeRecord, ParseError};
use crate::query::{
    BtrfsFindNew, InvalidSnapshotError, SnapshotQuery, SnapshotQueryError, ensure_snapshot_dir,
};
use crate::report::{self, ReportError};
use crate::tree::{ChangeAggregate, TreeBuilder};

pub struct Application;

impl Application {
    pub async fn run(config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = config.into();
        Self::run_with_query(&BtrfsFindNew, &config).await
    }

    /// The whole pipeline: validate, query, parse, aggregate, build,
    /// emit. Any failure aborts the run; there is no partial report.
    pub(crate) async fn run_with_query<Q: SnapshotQuery>(
        query: &Q,
        config: &RuntimeConfig,
    ) -> Result<(), ApplicationError> {
        ensure_snapshot_dir(&config.snapshot_old).context(SnapshotSnafu)?;
        ensure_snapshot_dir(&config.snapshot_new).context(SnapshotSnafu)?;

        let marker = query
            .transaction_marker(&config.snapshot_old)
            .await
            .context(QuerySnafu)?;
        debug!("Old snapshot transaction marker: {marker}");

        let lines = query
            .change_log(&config.snapshot_new, marker)
            .await
            .context(QuerySnafu)?;
        info!("Fetched {} change lines", lines.len());

        let records = lines
            .iter()
            .map(|line| changelog::parse_change_line(line))
            .collect::<Result<Vec<ChangeRecord>, ParseError>>()
            .context(ChangeLogSnafu)?;

        let aggregate = ChangeAggregate::from_records(&records);
        debug!(
            "Aggregated {} records, root total {} bytes",
            records.len(),
            aggregate.root_total()
        );

        let root = TreeBuilder::new(&aggregate, config.human_readable_sizes).build();
        report::write_report(&root, config.output.as_deref(), config.indent)
            .await
            .context(ReportSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Snapshot validation failed"))]
    SnapshotError { source: InvalidSnapshotError },
    #[snafu(display("Snapshot metadata query failed"))]
    QueryError { source: SnapshotQueryError },
    #[snafu(display("Failed to parse the change log"))]
    ChangeLogError { source: ParseError },
    #[snafu(display("Failed to write the report"))]
    ReportError { source: ReportError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Stands in for the external tool with canned output.
    struct CannedQuery {
        marker: u64,
        lines: Vec<String>,
    }

    impl SnapshotQuery for CannedQuery {
        async fn transaction_marker(&self, _snapshot: &Path) -> Result<u64, SnapshotQueryError> {
            Ok(self.marker)
        }

        async fn change_log(
            &self,
            _snapshot: &Path,
            _since: u64,
        ) -> Result<Vec<String>, SnapshotQueryError> {
            Ok(self.lines.clone())
        }
    }

    fn change_line(length: i64, path: &str) -> String {
        format!(
            "inode 257 file offset 0 len {length} disk start 12345 offset 0 gen 10 flags NONE {path}"
        )
    }

    struct Fixture {
        _snapshots: (TempDir, TempDir),
        _out_dir: TempDir,
        out_path: PathBuf,
        config: RuntimeConfig,
    }

    fn fixture() -> Fixture {
        let old = TempDir::new().expect("Failed to create temp directory");
        let new = TempDir::new().expect("Failed to create temp directory");
        let out_dir = TempDir::new().expect("Failed to create temp directory");
        let out_path = out_dir.path().join("report.json");
        let config = RuntimeConfig {
            snapshot_old: old.path().to_path_buf(),
            snapshot_new: new.path().to_path_buf(),
            output: Some(out_path.clone()),
            indent: 2,
            human_readable_sizes: false,
        };
        Fixture {
            _snapshots: (old, new),
            _out_dir: out_dir,
            out_path,
            config,
        }
    }

    fn read_report(path: &Path) -> serde_json::Value {
        let raw = std::fs::read_to_string(path).expect("Failed to read report");
        serde_json::from_str(&raw).expect("Report is not valid JSON")
    }

    #[compio::test]
    async fn pipeline_writes_a_nested_report() {
        let fixture = fixture();
        let query = CannedQuery {
            marker: 10,
            lines: vec![change_line(100, "a/b/file1"), change_line(50, "a/file2")],
        };

        Application::run_with_query(&query, &fixture.config)
            .await
            .expect("Pipeline failed");

        let report = read_report(&fixture.out_path);
        assert_eq!(report["name"], "/");
        assert_eq!(report["total_size"], 150);
        assert!(report.get("files").is_none());

        let a = &report["subfolders"][0];
        assert_eq!(a["name"], "a");
        assert_eq!(a["total_size"], 150);
        assert_eq!(a["files"]["file2"], "50.00 B");

        let b = &a["subfolders"][0];
        assert_eq!(b["name"], "b");
        assert_eq!(b["total_size"], 100);
        assert_eq!(b["files"]["file1"], "100.00 B");
    }

    #[compio::test]
    async fn human_readable_flag_formats_directory_totals() {
        let mut fixture = fixture();
        fixture.config.human_readable_sizes = true;
        let query = CannedQuery {
            marker: 10,
            lines: vec![change_line(2048, "a/file")],
        };

        Application::run_with_query(&query, &fixture.config)
            .await
            .expect("Pipeline failed");

        let report = read_report(&fixture.out_path);
        assert_eq!(report["total_size"], "2.00 KB");
        assert_eq!(report["subfolders"][0]["total_size"], "2.00 KB");
    }

    #[compio::test]
    async fn malformed_change_line_aborts_without_a_report() {
        let fixture = fixture();
        let query = CannedQuery {
            marker: 10,
            lines: vec!["inode 257 file offset 0 len".to_string()],
        };

        let result = Application::run_with_query(&query, &fixture.config).await;

        assert!(matches!(
            result,
            Err(ApplicationError::ChangeLogError { .. })
        ));
        assert!(!fixture.out_path.exists());
    }

    #[compio::test]
    async fn missing_snapshot_directory_is_rejected_before_querying() {
        let mut fixture = fixture();
        fixture.config.snapshot_old = fixture.out_path.join("nope");
        let query = CannedQuery {
            marker: 10,
            lines: Vec::new(),
        };

        let result = Application::run_with_query(&query, &fixture.config).await;

        assert!(matches!(result, Err(ApplicationError::SnapshotError { .. })));
        assert!(!fixture.out_path.exists());
    }
}
