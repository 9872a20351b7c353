//! Reader for the server-produced results file.
//!
//! The file is a JSON array of entries written by the server under test.
//! Only the outer array is required to be well-formed: each element is
//! decoded on its own, and a bad element becomes a per-entry error instead of
//! failing the whole file or silently defaulting cells to zero.
//!
//! The `taskName` of an element is read before anything else. Entries of a
//! kind the harness does not verify are reported as such whatever their
//! remaining fields look like.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::HarnessError;
use crate::matrix::Matrix;
use crate::task::TaskKind;

/// One result recorded by the server: the operands it received and the
/// product it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub task_name: String,
    pub matrix_a: Matrix,
    pub matrix_b: Matrix,
    pub result: Matrix,
    /// Time the server recorded the entry; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One element of a results document after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEntry {
    /// A supported task kind with well-formed operands and result.
    Entry(ResultEntry),
    /// The element names a task kind the harness does not verify.
    UnknownKind(String),
    /// The element could not be decoded; carries the reason.
    Malformed(String),
}

/// The part of an element every task kind shares.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryHeader {
    task_name: String,
}

/// Decode every element of a results document.
///
/// Returns [`HarnessError::ResultsParse`] only if `content` is not a JSON
/// array; element-level problems are returned in place.
pub fn parse_results(content: &str, path: &Path) -> Result<Vec<DecodedEntry>, HarnessError> {
    let raw: Vec<Value> =
        serde_json::from_str(content).map_err(|source| HarnessError::ResultsParse {
            source,
            path: path.display().to_string(),
        })?;

    Ok(raw.into_iter().map(decode_entry).collect())
}

/// Read and decode a results file.
pub fn load_results(path: &Path) -> Result<Vec<DecodedEntry>, HarnessError> {
    let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ResultsIo {
        source,
        path: path.display().to_string(),
    })?;
    parse_results(&content, path)
}

fn decode_entry(value: Value) -> DecodedEntry {
    let header = match EntryHeader::deserialize(&value) {
        Ok(header) => header,
        Err(e) => return DecodedEntry::Malformed(e.to_string()),
    };
    if header.task_name.parse::<TaskKind>().is_err() {
        return DecodedEntry::UnknownKind(header.task_name);
    }
    match serde_json::from_value(value) {
        Ok(entry) => DecodedEntry::Entry(entry),
        Err(e) => DecodedEntry::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_output() {
        let content = r#"[
          {
            "timestamp": "2025-01-30T10:00:00.000Z",
            "taskName": "matrix_multiplication",
            "matrixA": [[1, 2]],
            "matrixB": [[3], [4]],
            "result": [[11]]
          }
        ]"#;
        let entries = parse_results(content, Path::new("results.json")).unwrap();
        assert_eq!(entries.len(), 1);
        let DecodedEntry::Entry(entry) = &entries[0] else {
            panic!("expected a decoded entry, got {:?}", entries[0]);
        };
        assert_eq!(entry.task_name, "matrix_multiplication");
        assert_eq!(entry.result, Matrix::from_rows(vec![vec![11]]));
        assert_eq!(entry.timestamp.as_deref(), Some("2025-01-30T10:00:00.000Z"));
    }

    #[test]
    fn test_bad_cell_is_entry_error_not_zero() {
        let content = r#"[
          {"taskName": "matrix_multiplication", "matrixA": [["x"]], "matrixB": [[1]], "result": [[0]]},
          {"taskName": "matrix_multiplication", "matrixA": [[2]], "matrixB": [[1]], "result": [[2]]}
        ]"#;
        let entries = parse_results(content, Path::new("results.json")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], DecodedEntry::Malformed(_)));
        assert!(matches!(entries[1], DecodedEntry::Entry(_)));
    }

    #[test]
    fn test_missing_field_is_entry_error() {
        let content = r#"[{"taskName": "matrix_multiplication", "matrixA": [[1]], "matrixB": [[1]]}]"#;
        let entries = parse_results(content, Path::new("results.json")).unwrap();
        let DecodedEntry::Malformed(reason) = &entries[0] else {
            panic!("expected a malformed entry, got {:?}", entries[0]);
        };
        assert!(reason.contains("result"));
    }

    #[test]
    fn test_unknown_kind_wins_over_foreign_layout() {
        let content = r#"[
          {"taskName": "sort", "input": [3, 1, 2], "result": [1, 2, 3]},
          {"taskName": "matrix_multiplication", "matrixA": [[2]], "matrixB": [[3]], "result": [[6]]}
        ]"#;
        let entries = parse_results(content, Path::new("results.json")).unwrap();
        assert_eq!(entries[0], DecodedEntry::UnknownKind("sort".to_string()));
        assert!(matches!(entries[1], DecodedEntry::Entry(_)));
    }

    #[test]
    fn test_missing_or_non_string_task_name_is_malformed() {
        let content = r#"[
          {"matrixA": [[1]], "matrixB": [[1]], "result": [[1]]},
          {"taskName": 7, "matrixA": [[1]], "matrixB": [[1]], "result": [[1]]}
        ]"#;
        let entries = parse_results(content, Path::new("results.json")).unwrap();
        assert!(matches!(&entries[0], DecodedEntry::Malformed(r) if r.contains("taskName")));
        assert!(matches!(entries[1], DecodedEntry::Malformed(_)));
    }

    #[test]
    fn test_non_array_document_is_fatal() {
        let err = parse_results("{\"tasks\": []}", Path::new("out.json")).unwrap_err();
        assert!(matches!(err, HarnessError::ResultsParse { .. }));
        assert!(err.to_string().contains("out.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_results(&dir.path().join("results.json")).unwrap_err();
        assert!(matches!(err, HarnessError::ResultsIo { .. }));
    }
}
