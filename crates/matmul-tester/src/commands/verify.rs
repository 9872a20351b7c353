//! `matmul-tester verify` command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use matmul_harness::report::Reporter;
use matmul_harness::results::load_results;
use matmul_harness::verify::verify_entries;

/// Execute the `verify` command.
///
/// Every entry of the results file is verified on its own and reported by
/// ordinal. With `strict`, any entry that is not correct turns into a
/// non-zero exit after the full report has been printed.
pub fn execute(path: &Path, strict: bool) -> Result<()> {
    let entries = load_results(path)?;
    tracing::info!(
        target: "matmul.tester",
        entries = entries.len(),
        "Verifying {}",
        path.display()
    );

    let verdicts = verify_entries(entries);
    let mut reporter = Reporter::stdout();
    let counts = reporter
        .verdicts(&verdicts)
        .context("Failed to write report")?;

    if strict && !counts.all_correct() {
        anyhow::bail!(
            "{} of {} entries in '{}' did not verify",
            counts.total() - counts.correct,
            counts.total(),
            path.display()
        );
    }
    Ok(())
}
