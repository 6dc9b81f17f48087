use std::path::{Path, PathBuf};

use snafu::{Snafu, ensure};

use crate::ext::BestEffortPathExt;
use crate::query::QueryError;

/// The two operations the rest of the pipeline needs from the external
/// snapshot metadata tool.
pub trait SnapshotQuery {
    /// Returns the current transaction marker of the snapshot.
    async fn transaction_marker(&self, snapshot: &Path) -> Result<u64, SnapshotQueryError>;

    /// Returns the raw change-log lines for everything modified in the
    /// snapshot since the given transaction marker, trailer excluded.
    async fn change_log(
        &self,
        snapshot: &Path,
        since: u64,
    ) -> Result<Vec<String>, SnapshotQueryError>;
}

pub fn ensure_snapshot_dir(path: &Path) -> Result<(), InvalidSnapshotError> {
    ensure!(
        path.is_dir(),
        NotADirectorySnafu {
            path: path.to_path_buf()
        }
    );
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum SnapshotQueryError {
    #[snafu(display("Snapshot metadata query command failed"))]
    CommandError { source: QueryError },
    #[snafu(display("Snapshot did not yield a usable transaction marker"))]
    MarkerError { source: InvalidSnapshotError },
}

#[derive(Debug, Snafu)]
pub enum InvalidSnapshotError {
    #[snafu(display("{} is not an existing directory", path.best_effort_path_display()))]
    NotADirectoryError { path: PathBuf },
    #[snafu(display("No transaction marker in the query output for {}", snapshot.best_effort_path_display()))]
    MarkerNotFoundError { snapshot: PathBuf },
    #[snafu(display("Transaction marker '{}' is not an integer", value))]
    InvalidMarkerError {
        value: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("Transaction marker {} is not positive", value))]
    NonPositiveMarkerError { value: u64 },
}
