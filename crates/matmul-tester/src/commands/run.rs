//! `matmul-tester run` command implementation.

use anyhow::{Context, Result};

use matmul_harness::catalog::TaskCatalog;
use matmul_harness::config::Settings;
use matmul_harness::dispatch::Dispatcher;
use matmul_harness::report::Reporter;

/// Execute the `run` command.
///
/// Loads the catalog, sends each task in order and prints one line per task
/// as it finishes, then a summary. Only a missing or unreadable catalog is
/// fatal; per-task failures are reported and skipped.
pub async fn execute(settings: Settings) -> Result<()> {
    let catalog = TaskCatalog::load(&settings.catalog).with_context(|| {
        format!(
            "Cannot run catalog '{}'\nUse `matmul-tester add <task_name> <RxC>` to create one.",
            settings.catalog.display()
        )
    })?;

    let endpoint = settings.endpoint_url()?;
    let dispatcher = Dispatcher::new(endpoint, settings.timeout())?;

    tracing::info!(
        target: "matmul.tester",
        tasks = catalog.len(),
        endpoint = %dispatcher.endpoint(),
        "Running catalog {}",
        settings.catalog.display()
    );

    let mut reporter = Reporter::stdout();
    let mut write_result = Ok(());
    let run = dispatcher
        .run_catalog(&catalog, |_, record| {
            if write_result.is_ok() {
                write_result = reporter.record(record);
            }
        })
        .await;
    write_result.context("Failed to write report")?;

    reporter
        .run_summary(&run)
        .context("Failed to write report")?;
    Ok(())
}
