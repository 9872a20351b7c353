//! Independent re-verification of claimed products.
//!
//! The expected product is recomputed with the plain triple loop and compared
//! exactly; no floating-point tolerance applies since every input is an
//! integer.

use std::fmt;

use crate::matrix::Matrix;
use crate::results::{DecodedEntry, ResultEntry};
use crate::task::TaskKind;

/// Why a claimed product was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The operands cannot be multiplied: `A` is empty or has no columns,
    /// either operand is ragged, or `columns(A) != rows(B)`.
    InvalidOperands { reason: String },
    /// The claimed result does not have shape `rows(A) x columns(B)`.
    Shape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// First cell (row-major) where the claimed value differs.
    Element {
        row: usize,
        col: usize,
        expected: i128,
        actual: i64,
    },
    /// An expected entry does not fit in 128-bit arithmetic.
    Overflow { row: usize, col: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperands { reason } => write!(f, "invalid operands: {}", reason),
            Self::Shape { expected, actual } => write!(
                f,
                "result shape {}x{} does not match expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::Element {
                row,
                col,
                expected,
                actual,
            } => write!(
                f,
                "cell [{}][{}] is {}, expected {}",
                row, col, actual, expected
            ),
            Self::Overflow { row, col } => {
                write!(f, "expected value at [{}][{}] overflows", row, col)
            },
        }
    }
}

/// Check that `claimed == a * b`, reporting the first reason it is not.
pub fn check_product(a: &Matrix, b: &Matrix, claimed: &Matrix) -> Result<(), Mismatch> {
    let invalid = |reason: &str| Mismatch::InvalidOperands {
        reason: reason.to_string(),
    };

    if a.is_empty() {
        return Err(invalid("matrix A has no rows"));
    }
    if a.col_count() == 0 {
        return Err(invalid("matrix A has no columns"));
    }
    if !a.is_rectangular() {
        return Err(invalid("matrix A is not rectangular"));
    }
    if !b.is_rectangular() {
        return Err(invalid("matrix B is not rectangular"));
    }
    let (n, m) = a.shape();
    if m != b.row_count() {
        return Err(Mismatch::InvalidOperands {
            reason: format!(
                "columns of A ({}) do not match rows of B ({})",
                m,
                b.row_count()
            ),
        });
    }
    let p = b.col_count();

    // A ragged claimed result also fails here: every row must be p long.
    let claimed_rect = claimed.row_count() == n && claimed.rows().iter().all(|r| r.len() == p);
    if !claimed_rect {
        return Err(Mismatch::Shape {
            expected: (n, p),
            actual: claimed.shape(),
        });
    }

    let (ra, rb, rc) = (a.rows(), b.rows(), claimed.rows());
    for i in 0..n {
        for j in 0..p {
            let mut expected: i128 = 0;
            for k in 0..m {
                expected = (ra[i][k] as i128)
                    .checked_mul(rb[k][j] as i128)
                    .and_then(|term| expected.checked_add(term))
                    .ok_or(Mismatch::Overflow { row: i, col: j })?;
            }
            let actual = rc[i][j];
            if expected != actual as i128 {
                return Err(Mismatch::Element {
                    row: i,
                    col: j,
                    expected,
                    actual,
                });
            }
        }
    }
    Ok(())
}

/// `true` iff `claimed` is exactly `a * b`. Invalid operands are a failure.
pub fn verify(a: &Matrix, b: &Matrix, claimed: &Matrix) -> bool {
    check_product(a, b, claimed).is_ok()
}

/// Outcome of verifying one results-file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The claimed result equals the recomputed product.
    Correct,
    /// The claimed result is wrong or the operands were unusable.
    Incorrect(Mismatch),
    /// The entry names a task kind the harness does not verify.
    UnknownTaskKind(String),
    /// The entry could not be decoded into a typed result.
    Malformed(String),
}

impl Verdict {
    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect(_) => "incorrect",
            Self::UnknownTaskKind(_) => "unknown",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Verify one decoded entry according to its task kind.
pub fn verify_entry(entry: &ResultEntry) -> Verdict {
    match entry.task_name.parse::<TaskKind>() {
        Ok(TaskKind::MatrixMultiplication) => {
            match check_product(&entry.matrix_a, &entry.matrix_b, &entry.result) {
                Ok(()) => Verdict::Correct,
                Err(mismatch) => Verdict::Incorrect(mismatch),
            }
        },
        Err(_) => Verdict::UnknownTaskKind(entry.task_name.clone()),
    }
}

/// Verify every entry independently, preserving order.
///
/// An entry that failed to decode becomes [`Verdict::Malformed`]; it does not
/// affect its neighbours.
pub fn verify_entries<I>(entries: I) -> Vec<Verdict>
where
    I: IntoIterator<Item = DecodedEntry>,
{
    entries
        .into_iter()
        .map(|entry| match entry {
            DecodedEntry::Entry(entry) => verify_entry(&entry),
            DecodedEntry::UnknownKind(name) => Verdict::UnknownTaskKind(name),
            DecodedEntry::Malformed(reason) => Verdict::Malformed(reason),
        })
        .collect()
}
