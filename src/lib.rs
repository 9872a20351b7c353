//! Correctness and latency harness for matrix-multiplication servers.
//!
//! The crate covers three jobs:
//!
//! - generating task fixtures of a requested size ([`fixture`]) and keeping
//!   them in a JSON catalog ([`catalog`]);
//! - sending each catalog task to the server under test and timing the round
//!   trip ([`dispatch`]);
//! - recomputing the product of every entry in a server-produced results file
//!   and checking the claimed result exactly ([`verify`], [`results`]).
//!
//! The `matmul-tester` binary in `crates/matmul-tester` wires these into a CLI.
//!
//! # Example
//!
//! ```rust
//! use matmul_harness::fixture::FixtureGenerator;
//! use matmul_harness::task::{SizeSpec, TaskKind};
//! use matmul_harness::verify::verify;
//!
//! let mut fixtures = FixtureGenerator::from_seed(7);
//! let task = fixtures.generate_task(TaskKind::MatrixMultiplication, "2x3".parse::<SizeSpec>().unwrap());
//!
//! let product = task.matrix_a.multiply(&task.matrix_b).unwrap();
//! assert!(verify(&task.matrix_a, &task.matrix_b, &product));
//! ```

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fixture;
pub mod matrix;
pub mod report;
pub mod results;
pub mod task;
pub mod verify;

pub use catalog::TaskCatalog;
pub use config::{HarnessConfig, Settings};
pub use dispatch::{DispatchRecord, DispatchRun, Dispatcher, TestOutcome};
pub use error::{DispatchError, HarnessError};
pub use fixture::FixtureGenerator;
pub use matrix::Matrix;
pub use report::Reporter;
pub use results::{DecodedEntry, ResultEntry};
pub use task::{SizeSpec, Task, TaskKind};
pub use verify::{check_product, verify, Mismatch, Verdict};
