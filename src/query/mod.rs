//! Access to the external snapshot metadata query.
//!
//! The query runs a privileged external command, so everything that
//! consumes its results goes through the [`SnapshotQuery`] trait and can
//! be exercised with canned line sequences instead of a real subprocess.

mod find_new;
mod snapshot_query;

pub use find_new::{BtrfsFindNew, QueryError};
pub use snapshot_query::{
    InvalidSnapshotError, SnapshotQuery, SnapshotQueryError, ensure_snapshot_dir,
};
