//! Human-readable reporting of dispatch outcomes and verification verdicts.
//!
//! The `format_*` functions are pure: they take structured data and return a
//! line. [`Reporter`] only writes those lines to a stream, so report output
//! never feeds back into control flow.
//!
//! Color coding is applied via the `colored` crate, which respects the global
//! override set by `colored::control::set_override(false)` when `--no-color`
//! is active or stdout is piped.

use colored::Colorize;
use std::io::{self, Write};

use crate::dispatch::{DispatchFailure, DispatchRecord, DispatchRun, TestOutcome};
use crate::verify::Verdict;

/// `Task: <name>, Time: <ms> ms, Status: <status>`
pub fn format_outcome(outcome: &TestOutcome) -> String {
    let status = if outcome.server_status.starts_with('2') {
        outcome.server_status.green().to_string()
    } else {
        outcome.server_status.yellow().to_string()
    };
    format!(
        "Task: {}, Time: {} ms, Status: {}",
        outcome.task_name, outcome.elapsed_ms, status
    )
}

/// `Task: <name>, FAILED (<category>): <error>`
pub fn format_failure(failure: &DispatchFailure) -> String {
    format!(
        "Task: {}, {} ({}): {}",
        failure.task_name,
        "FAILED".red().bold(),
        failure.error.category(),
        failure.error
    )
}

pub fn format_record(record: &DispatchRecord) -> String {
    match record {
        DispatchRecord::Completed(outcome) => format_outcome(outcome),
        DispatchRecord::Failed(failure) => format_failure(failure),
    }
}

/// One line per verification entry, keyed by its ordinal in the file.
pub fn format_verdict(index: usize, verdict: &Verdict) -> String {
    match verdict {
        Verdict::Correct => format!(
            "Entry #{}: {} - the result of matrix multiplication is correct.",
            index,
            "OK".green().bold()
        ),
        Verdict::Incorrect(mismatch) => format!(
            "Entry #{}: {} - the result of multiplication is incorrect ({}).",
            index,
            "ERROR".red().bold(),
            mismatch
        ),
        Verdict::UnknownTaskKind(name) => format!(
            "Entry #{}: {} - unknown task type ({}).",
            index,
            "SKIP".yellow(),
            name
        ),
        Verdict::Malformed(reason) => format!(
            "Entry #{}: {} - entry could not be decoded ({}).",
            index,
            "ERROR".red().bold(),
            reason
        ),
    }
}

/// Closing line for a catalog run: counts, min/mean/max latency and the
/// wall time of the whole run.
pub fn format_run_summary(run: &DispatchRun) -> String {
    let latencies: Vec<u64> = run.outcomes().map(|o| o.elapsed_ms).collect();
    let failed = run.failed_count();
    let failed_str = if failed > 0 {
        failed.to_string().red().to_string()
    } else {
        failed.to_string()
    };

    let mut line = format!(
        "Dispatched {} task(s): {} completed, {} failed",
        run.records.len(),
        latencies.len(),
        failed_str
    );
    if let (Some(min), Some(max)) = (latencies.iter().min(), latencies.iter().max()) {
        let mean = latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
        line.push_str(&format!(
            "; latency min={}ms mean={:.1}ms max={}ms",
            min, mean, max
        ));
    }
    line.push_str(&format!("; total {}ms", run.duration.as_millis()));
    line
}

/// Per-label counts of a verification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub unknown: usize,
    pub malformed: usize,
}

impl VerdictCounts {
    pub fn tally(verdicts: &[Verdict]) -> Self {
        let mut counts = Self::default();
        for verdict in verdicts {
            match verdict {
                Verdict::Correct => counts.correct += 1,
                Verdict::Incorrect(_) => counts.incorrect += 1,
                Verdict::UnknownTaskKind(_) => counts.unknown += 1,
                Verdict::Malformed(_) => counts.malformed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.correct + self.incorrect + self.unknown + self.malformed
    }

    /// `true` when every entry verified as correct.
    pub fn all_correct(&self) -> bool {
        self.correct == self.total()
    }
}

/// Closing line for a verification pass.
pub fn format_verify_summary(counts: &VerdictCounts) -> String {
    format!(
        "Verified {} entr{}: {} correct, {} incorrect, {} unknown, {} malformed",
        counts.total(),
        if counts.total() == 1 { "y" } else { "ies" },
        counts.correct,
        counts.incorrect,
        counts.unknown,
        counts.malformed
    )
}

/// Writes report lines to a stream.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn record(&mut self, record: &DispatchRecord) -> io::Result<()> {
        writeln!(self.out, "{}", format_record(record))
    }

    pub fn verdict(&mut self, index: usize, verdict: &Verdict) -> io::Result<()> {
        writeln!(self.out, "{}", format_verdict(index, verdict))
    }

    pub fn run_summary(&mut self, run: &DispatchRun) -> io::Result<()> {
        writeln!(self.out, "{}", format_run_summary(run))
    }

    /// Write every verdict followed by the summary line; returns the counts.
    pub fn verdicts(&mut self, verdicts: &[Verdict]) -> io::Result<VerdictCounts> {
        for (index, verdict) in verdicts.iter().enumerate() {
            self.verdict(index, verdict)?;
        }
        let counts = VerdictCounts::tally(verdicts);
        writeln!(self.out, "{}", format_verify_summary(&counts))?;
        Ok(counts)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
