use hashlink::LinkedHashMap;

use crate::tree::ChangeAggregate;
use crate::tree::aggregate::base_name;
use crate::tree::human_size::human_readable_size;
use crate::tree::node::{FolderNode, SizeValue};

const ROOT_NAME: &str = "/";

/// Expands the flat aggregate into a nested [`FolderNode`] tree.
///
/// File sizes are always rendered human-readable; directory totals only
/// when `human_readable_sizes` is set.
pub struct TreeBuilder<'a> {
    aggregate: &'a ChangeAggregate,
    human_readable_sizes: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(aggregate: &'a ChangeAggregate, human_readable_sizes: bool) -> Self {
        Self {
            aggregate,
            human_readable_sizes,
        }
    }

    pub fn build(&self) -> FolderNode {
        self.build_folder("")
    }

    fn build_folder(&self, folder: &str) -> FolderNode {
        let name = if folder.is_empty() {
            ROOT_NAME.to_string()
        } else {
            base_name(folder).to_string()
        };

        let total = self.aggregate.folder_total(folder);
        let total_size = if self.human_readable_sizes {
            SizeValue::Human(human_readable_size(Some(total)))
        } else {
            SizeValue::Bytes(total)
        };

        // Files sorted by accumulated size, largest first. Tie order is
        // unspecified.
        let mut files: Vec<(&str, i64)> = self.aggregate.files_in(folder).collect();
        files.sort_by(|a, b| b.1.cmp(&a.1));
        let files: LinkedHashMap<String, String> = files
            .into_iter()
            .map(|(path, size)| {
                (
                    base_name(path).to_string(),
                    human_readable_size(Some(size)),
                )
            })
            .collect();

        // Subfolders sorted by the magnitude of their total, largest
        // first.
        let mut subfolders: Vec<(&str, i64)> = self.aggregate.subfolders_of(folder).collect();
        subfolders.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()));
        let subfolders = subfolders
            .into_iter()
            .map(|(path, _)| self.build_folder(path))
            .collect();

        FolderNode {
            name,
            total_size,
            files,
            subfolders,
        }
    }
}
