//! Tasks, task kinds and size tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HarnessError;
use crate::matrix::Matrix;

/// One unit of work sent to the server under test.
///
/// Field names follow the wire format shared with the server:
/// `{"taskName": ..., "matrixA": [[...]], "matrixB": [[...]]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Name of the task; doubles as the task kind on the server side.
    pub task_name: String,
    /// Left operand.
    pub matrix_a: Matrix,
    /// Right operand.
    pub matrix_b: Matrix,
}

impl Task {
    pub fn new(task_name: impl Into<String>, matrix_a: Matrix, matrix_b: Matrix) -> Self {
        Self {
            task_name: task_name.into(),
            matrix_a,
            matrix_b,
        }
    }
}

/// Computations the harness knows how to generate and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// `A * B` over integer matrices.
    MatrixMultiplication,
}

impl TaskKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatrixMultiplication => "matrix_multiplication",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matrix_multiplication" => Ok(Self::MatrixMultiplication),
            other => Err(HarnessError::UnsupportedTask {
                name: other.to_string(),
            }),
        }
    }
}

/// A parsed `RxC` size token, e.g. `100x100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub rows: usize,
    pub cols: usize,
}

impl SizeSpec {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for SizeSpec {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| HarnessError::InvalidSize {
            token: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.trim().split('x').collect();
        if parts.len() != 2 {
            return Err(invalid("expected exactly one 'x' separator".to_string()));
        }

        let rows = parts[0]
            .parse::<usize>()
            .map_err(|e| invalid(format!("rows '{}': {}", parts[0], e)))?;
        let cols = parts[1]
            .parse::<usize>()
            .map_err(|e| invalid(format!("columns '{}': {}", parts[1], e)))?;

        Ok(Self { rows, cols })
    }
}
