use std::path::{Path, PathBuf};

use compio::{fs::File, io::AsyncWriteAtExt};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::tree::FolderNode;

/// Serializes the tree with the requested indentation width.
pub fn render_json(root: &FolderNode, indent: usize) -> Result<String, ReportError> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());

    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    root.serialize(&mut serializer).context(SerializeSnafu)?;

    String::from_utf8(buffer).context(Utf8Snafu)
}

/// Writes the report to `output`, replacing any existing file, or to
/// standard output when no path is given.
pub async fn write_report(
    root: &FolderNode,
    output: Option<&Path>,
    indent: usize,
) -> Result<(), ReportError> {
    let json = render_json(root, indent)?;

    match output {
        Some(path) => {
            debug!("Writing report to {}", path.best_effort_path_display());
            let mut file = File::create(path).await.context(WriteSnafu {
                path: path.to_path_buf(),
            })?;
            let res = file.write_all_at(json.into_bytes(), 0).await;
            res.0.context(WriteSnafu {
                path: path.to_path_buf(),
            })?;
        }
        None => println!("{json}"),
    }

    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Failed to serialize the report"))]
    SerializeError { source: serde_json::Error },
    #[snafu(display("Report serialization produced invalid UTF-8"))]
    Utf8Error { source: std::string::FromUtf8Error },
    #[snafu(display("Failed to write the report to {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SizeValue;
    use hashlink::LinkedHashMap;
    use tempfile::TempDir;

    fn sample_tree() -> FolderNode {
        let mut files = LinkedHashMap::new();
        files.insert("file2".to_string(), "50.00 B".to_string());
        FolderNode {
            name: "/".to_string(),
            total_size: SizeValue::Bytes(150),
            files: LinkedHashMap::new(),
            subfolders: vec![FolderNode {
                name: "a".to_string(),
                total_size: SizeValue::Bytes(150),
                files,
                subfolders: Vec::new(),
            }],
        }
    }

    #[test]
    fn indentation_width_is_respected() {
        let json = render_json(&sample_tree(), 4).unwrap();
        assert!(json.contains("\n    \"name\""));

        let json = render_json(&sample_tree(), 2).unwrap();
        assert!(json.contains("\n  \"name\""));
    }

    #[test]
    fn rendered_json_round_trips_as_a_value() {
        let json = render_json(&sample_tree(), 4).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "/");
        assert_eq!(value["total_size"], 150);
        assert_eq!(value["subfolders"][0]["files"]["file2"], "50.00 B");
        assert!(value.get("files").is_none());
    }

    #[compio::test]
    async fn report_is_written_to_the_given_path() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("report.json");

        write_report(&sample_tree(), Some(&path), 2)
            .await
            .expect("Failed to write report");

        let written = std::fs::read_to_string(&path).expect("Failed to read report back");
        assert_eq!(written, render_json(&sample_tree(), 2).unwrap());
    }

    #[compio::test]
    async fn existing_report_file_is_replaced() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("report.json");
        std::fs::write(&path, "stale content that is much longer than the new report")
            .expect("Failed to seed file");

        write_report(&sample_tree(), Some(&path), 0)
            .await
            .expect("Failed to write report");

        let written = std::fs::read_to_string(&path).expect("Failed to read report back");
        assert!(!written.contains("stale"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["name"], "/");
    }
}
