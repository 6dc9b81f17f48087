use std::collections::HashMap;

use crate::changelog::ChangeRecord;

/// Flat byte totals folded from a sequence of change records.
///
/// `folder_totals` maps every touched directory (the empty string is the
/// root) to the sum of lengths of all records anywhere beneath it, so a
/// record contributes once to each of its ancestors. `files` maps a
/// directory to the accumulated totals of the files directly in it,
/// keyed by full path.
#[derive(Debug, Default)]
pub struct ChangeAggregate {
    folder_totals: HashMap<String, i64>,
    files: HashMap<String, HashMap<String, i64>>,
}

impl ChangeAggregate {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        let mut aggregate = Self::default();
        for record in records {
            aggregate.add(record);
        }
        aggregate
    }

    /// Folds one record in. Repeated paths accumulate; nothing is
    /// deduplicated.
    pub fn add(&mut self, record: &ChangeRecord) {
        let parent = parent_path(&record.path);
        *self
            .files
            .entry(parent.to_string())
            .or_default()
            .entry(record.path.clone())
            .or_insert(0) += record.length;

        let mut folder = parent.to_string();
        loop {
            *self.folder_totals.entry(folder.clone()).or_insert(0) += record.length;
            if folder.is_empty() {
                break;
            }
            folder = parent_path(&folder).to_string();
        }
    }

    pub fn folder_total(&self, folder: &str) -> i64 {
        self.folder_totals.get(folder).copied().unwrap_or(0)
    }

    pub fn root_total(&self) -> i64 {
        self.folder_total("")
    }

    /// Files directly in `folder`, as (full path, total) pairs in no
    /// particular order.
    pub fn files_in<'a>(&'a self, folder: &str) -> impl Iterator<Item = (&'a str, i64)> + 'a {
        self.files
            .get(folder)
            .into_iter()
            .flatten()
            .map(|(path, total)| (path.as_str(), *total))
    }

    /// Directories whose direct parent is `folder`, as (path, total)
    /// pairs. The root is never its own child.
    pub fn subfolders_of<'a>(
        &'a self,
        folder: &'a str,
    ) -> impl Iterator<Item = (&'a str, i64)> + 'a {
        self.folder_totals
            .iter()
            .filter(move |(path, _)| !path.is_empty() && parent_path(path) == folder)
            .map(|(path, total)| (path.as_str(), *total))
    }
}

/// The directory containing `path`; the empty string is the root.
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[..index],
        None => "",
    }
}

/// The last component of `path`.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(index) => &path[index + 1..],
        None => path,
    }
}
