use std::path::{Path, PathBuf};
use std::process::Stdio;

use compio::{io::compat::AsyncStream, process::Command};
use futures::{AsyncBufReadExt, StreamExt, io::BufReader};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::query::snapshot_query::{InvalidSnapshotError, SnapshotQuery, SnapshotQueryError};

const PRIVILEGE_HELPER: &str = "sudo";
const QUERY_COMMAND: [&str; 3] = ["btrfs", "subvolume", "find-new"];
/// Upper bound passed when only the trailer line is wanted; larger than
/// any transaction generation a live filesystem will reach.
const HIGHEST_TRANSID_BOUND: u64 = 9_999_999;
const TRANSID_MARKER_PREFIX: &str = "transid marker was ";

/// Queries snapshot metadata by running `btrfs subvolume find-new`
/// through the privilege escalation helper.
pub struct BtrfsFindNew;

impl SnapshotQuery for BtrfsFindNew {
    async fn transaction_marker(&self, snapshot: &Path) -> Result<u64, SnapshotQueryError> {
        let lines = self
            .run_query(snapshot, HIGHEST_TRANSID_BOUND)
            .await
            .map_err(|source| SnapshotQueryError::CommandError { source })?;

        extract_transaction_marker(&lines, snapshot)
            .map_err(|source| SnapshotQueryError::MarkerError { source })
    }

    async fn change_log(
        &self,
        snapshot: &Path,
        since: u64,
    ) -> Result<Vec<String>, SnapshotQueryError> {
        let mut lines = self
            .run_query(snapshot, since)
            .await
            .map_err(|source| SnapshotQueryError::CommandError { source })?;

        // The tool appends a one-line trailer with the new transaction
        // marker; only the change lines above it are wanted here.
        lines.pop();
        Ok(lines)
    }
}

impl BtrfsFindNew {
    fn create_command(snapshot: &Path, transid_bound: u64) -> Command {
        let mut cmd = Command::new(PRIVILEGE_HELPER);
        cmd.args(QUERY_COMMAND);
        cmd.arg(snapshot);
        cmd.arg(transid_bound.to_string());
        let _ = cmd.stdout(Stdio::piped());
        cmd
    }

    async fn run_query(&self, snapshot: &Path, transid_bound: u64) -> Result<Vec<String>, QueryError> {
        debug!(
            "Running {} {} {} {}",
            PRIVILEGE_HELPER,
            QUERY_COMMAND.join(" "),
            snapshot.best_effort_path_display(),
            transid_bound
        );
        let mut cmd = Self::create_command(snapshot, transid_bound);
        let mut handle = cmd.spawn().context(SpawnSnafu {
            snapshot: snapshot.to_path_buf(),
        })?;

        let mut lines = Vec::new();
        if let Some(stdout) = handle.stdout.take() {
            let reader = BufReader::new(AsyncStream::new(stdout));
            let mut line_stream = reader.lines();

            while let Some(line_result) = line_stream.next().await {
                let line = line_result.context(ReadOutputSnafu {
                    snapshot: snapshot.to_path_buf(),
                })?;
                lines.push(line);
            }
        }

        let status = handle.wait().await.context(WaitSnafu {
            snapshot: snapshot.to_path_buf(),
        })?;

        if !status.success() {
            return Err(QueryError::UnsuccessfulExecution {
                snapshot: snapshot.to_path_buf(),
                status: status.code().unwrap_or(-1),
            });
        }

        debug!("Query returned {} lines", lines.len());
        Ok(lines)
    }
}

fn extract_transaction_marker(
    lines: &[String],
    snapshot: &Path,
) -> Result<u64, InvalidSnapshotError> {
    let value = lines
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix(TRANSID_MARKER_PREFIX))
        .ok_or_else(|| InvalidSnapshotError::MarkerNotFoundError {
            snapshot: snapshot.to_path_buf(),
        })?;

    let marker = value
        .trim()
        .parse::<u64>()
        .map_err(|source| InvalidSnapshotError::InvalidMarkerError {
            value: value.to_string(),
            source,
        })?;

    if marker == 0 {
        return Err(InvalidSnapshotError::NonPositiveMarkerError { value: marker });
    }
    Ok(marker)
}

#[derive(Debug, Snafu)]
pub enum QueryError {
    #[snafu(display("Failed to spawn the snapshot query for {}", snapshot.best_effort_path_display()))]
    SpawnError {
        snapshot: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read query output for {}", snapshot.best_effort_path_display()))]
    ReadOutputError {
        snapshot: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for the snapshot query for {}", snapshot.best_effort_path_display()))]
    WaitError {
        snapshot: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Snapshot query for {} failed with exit code {}", snapshot.best_effort_path_display(), status))]
    UnsuccessfulExecution { snapshot: PathBuf, status: i32 },
}
