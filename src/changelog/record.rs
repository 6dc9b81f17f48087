/// One reported file modification since a given transaction marker.
///
/// `path` is relative to the snapshot root and slash-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    pub length: i64,
    pub offset: u64,
}
