use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub snapshot_old: PathBuf,
    pub snapshot_new: PathBuf,
    pub output: Option<PathBuf>,
    pub indent: usize,
    pub human_readable_sizes: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            snapshot_old: cli.snapshot_old,
            snapshot_new: cli.snapshot_new,
            output: cli.output,
            indent: cli.indent,
            human_readable_sizes: cli.human_readable_sizes,
        }
    }
}
