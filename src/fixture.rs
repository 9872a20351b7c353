//! Random matrix fixtures.
//!
//! The generator owns its random source instead of relying on a process-wide
//! one, so tests can pin a seed while the CLI seeds from entropy.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::matrix::Matrix;
use crate::task::{SizeSpec, Task, TaskKind};

/// Upper bound (exclusive) of generated entries.
pub const MAX_ENTRY: i64 = 10;

/// Produces random matrices with entries in `0..MAX_ENTRY`.
///
/// # Example
///
/// ```rust
/// use matmul_harness::fixture::FixtureGenerator;
///
/// let mut fixtures = FixtureGenerator::from_seed(42);
/// let m = fixtures.generate(3, 4);
/// assert_eq!(m.shape(), (3, 4));
/// ```
pub struct FixtureGenerator {
    rng: StdRng,
}

impl FixtureGenerator {
    /// Generator seeded once from the thread-local entropy source.
    ///
    /// Successive calls on the same generator produce different matrices;
    /// nothing is reproducible across runs.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generator for a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A `rows` x `cols` matrix of uniform entries. A zero dimension yields a
    /// matrix without elements.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Matrix {
        let data: Vec<Vec<i64>> = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| self.rng.random_range(0..MAX_ENTRY))
                    .collect()
            })
            .collect();
        Matrix::from_rows(data)
    }

    /// Build a task of the given kind and size.
    ///
    /// For matrix multiplication `A` is `rows x cols` and `B` is
    /// `cols x rows`, so the product is square.
    pub fn generate_task(&mut self, kind: TaskKind, size: SizeSpec) -> Task {
        match kind {
            TaskKind::MatrixMultiplication => {
                let matrix_a = self.generate(size.rows, size.cols);
                let matrix_b = self.generate(size.cols, size.rows);
                Task::new(kind.as_str(), matrix_a, matrix_b)
            },
        }
    }
}
