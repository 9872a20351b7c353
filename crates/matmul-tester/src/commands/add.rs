//! `matmul-tester add` command implementation.

use anyhow::Result;

use matmul_harness::catalog::append_task;
use matmul_harness::config::Settings;
use matmul_harness::fixture::FixtureGenerator;
use matmul_harness::task::{SizeSpec, TaskKind};

/// Execute the `add` command.
///
/// Validates the task name and size token before touching the catalog, then
/// generates the operands and appends the task.
pub fn execute(settings: &Settings, task_name: &str, size: &str, seed: Option<u64>) -> Result<()> {
    let kind: TaskKind = task_name.parse()?;
    let size: SizeSpec = size.parse()?;

    let mut fixtures = match seed {
        Some(seed) => FixtureGenerator::from_seed(seed),
        None => FixtureGenerator::from_entropy(),
    };
    let task = fixtures.generate_task(kind, size);
    let (a, b) = (task.matrix_a.shape(), task.matrix_b.shape());

    let count = append_task(&settings.catalog, task)?;
    tracing::info!(
        target: "matmul.tester",
        catalog = %settings.catalog.display(),
        tasks = count,
        "Catalog updated"
    );

    println!(
        "Added task '{}' with matrices of dimensions [{}x{}] and [{}x{}]",
        kind, a.0, a.1, b.0, b.1
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matmul_harness::catalog::TaskCatalog;

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            catalog: dir.join("tasks.json"),
            ..Settings::default()
        }
    }

    #[test]
    fn test_add_creates_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        execute(&settings, "matrix_multiplication", "4x2", Some(1)).unwrap();

        let catalog = TaskCatalog::load(&settings.catalog).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tasks[0].matrix_a.shape(), (4, 2));
        assert_eq!(catalog.tasks[0].matrix_b.shape(), (2, 4));
    }

    #[test]
    fn test_bad_size_leaves_catalog_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        assert!(execute(&settings, "matrix_multiplication", "4by2", None).is_err());
        assert!(!settings.catalog.exists());
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let err = execute(&settings, "matrix_inversion", "2x2", None).unwrap_err();
        assert!(err.to_string().contains("matrix_inversion"));
        assert!(!settings.catalog.exists());
    }
}
