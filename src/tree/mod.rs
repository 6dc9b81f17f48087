//! Aggregation of change records into per-directory byte totals and the
//! nested folder tree the report is built from.

mod aggregate;
mod builder;
mod human_size;
mod node;

pub use aggregate::ChangeAggregate;
pub use builder::TreeBuilder;
pub use human_size::human_readable_size;
pub use node::{FolderNode, SizeValue};
