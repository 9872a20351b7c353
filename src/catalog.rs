//! JSON-backed task catalog.
//!
//! The catalog is read whole, mutated in memory and written back whole. The
//! write goes to a temporary file next to the target which is then renamed
//! over it, so a reader never sees a half-written document.
//!
//! There is no locking: two `add` invocations racing on the same file can
//! lose one of the appended tasks.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::HarnessError;
use crate::task::Task;

/// Default catalog file name, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "tasks.json";

/// Ordered list of tasks, persisted as `{"tasks": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCatalog {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog document. `path` is only used for error messages.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, HarnessError> {
        serde_json::from_str(content).map_err(|source| HarnessError::CatalogParse {
            source,
            path: path.display().to_string(),
        })
    }

    /// Load a catalog that must exist.
    ///
    /// Returns [`HarnessError::CatalogIo`] if the file cannot be read and
    /// [`HarnessError::CatalogParse`] if it is not a catalog document.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::CatalogIo {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_json(&content, path)
    }

    /// Load a catalog, treating a missing or blank file as empty.
    pub fn load_or_default(path: &Path) -> Result<Self, HarnessError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::CatalogIo {
            source,
            path: path.display().to_string(),
        })?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_json(&content, path)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the file at `path` with this catalog.
    pub fn save(&self, path: &Path) -> Result<(), HarnessError> {
        let json = self.to_json()?;
        let write_err = |source: std::io::Error| HarnessError::CatalogWrite {
            source,
            path: path.display().to_string(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Append a task, keeping insertion order.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}

/// Load the catalog at `path` (or start an empty one), append `task` and
/// write it back. Returns the number of tasks now in the catalog.
pub fn append_task(path: &Path, task: Task) -> Result<usize, HarnessError> {
    let mut catalog = TaskCatalog::load_or_default(path)?;
    catalog.push(task);
    catalog.save(path)?;
    Ok(catalog.len())
}
