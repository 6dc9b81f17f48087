use hashlink::LinkedHashMap;
use serde::Serialize;

/// A directory total, either raw bytes or a pre-formatted size string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SizeValue {
    Bytes(i64),
    Human(String),
}

/// One directory of the report tree.
///
/// `files` keeps its insertion order (size-descending, see the builder)
/// and holds pre-formatted size strings. Empty `files` and `subfolders`
/// are left out of the serialized form entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub name: String,
    pub total_size: SizeValue,
    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub files: LinkedHashMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subfolders: Vec<FolderNode>,
}
