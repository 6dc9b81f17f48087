use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Report per-directory byte deltas between two btrfs snapshots as a nested JSON tree"
)]
pub struct Cli {
    /// The older snapshot (its transaction marker bounds the change log)
    pub snapshot_old: PathBuf,

    /// The newer snapshot to fetch changes from
    pub snapshot_new: PathBuf,

    /// Write the JSON report to this file instead of standard output
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// JSON indentation width
    #[clap(long, short, default_value_t = 4)]
    pub indent: usize,

    /// Render directory totals as human-readable size strings
    #[clap(long = "human-readable-sizes", visible_alias = "human")]
    pub human_readable_sizes: bool,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
