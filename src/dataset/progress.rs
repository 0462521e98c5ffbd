//! Progress tracking for a generation sweep.
//!
//! Counts successful and failed items against the expected total and emits a
//! structured `tracing` line as each record lands, so long sweeps can be
//! followed from the logs alone.

use std::time::{Duration, Instant};

/// Snapshot of sweep progress at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Items the sweep expects to attempt.
    pub expected: u64,
    /// Records written so far.
    pub succeeded: u64,
    /// Items that failed and were skipped.
    pub failed: u64,
    /// Wall-clock time since the sweep started.
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Percentage of the expected total that has been written, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.expected == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.expected as f64 * 100.0).min(100.0)
    }
}

/// Counters for one sweep.
#[derive(Debug)]
pub struct SweepProgress {
    expected: u64,
    succeeded: u64,
    failed: u64,
    started: Instant,
}

impl SweepProgress {
    pub fn new(expected: u64) -> Self {
        Self {
            expected,
            succeeded: 0,
            failed: 0,
            started: Instant::now(),
        }
    }

    /// Advance after a record has been written.
    pub fn record_success(&mut self, id: &str) {
        self.succeeded = self.succeeded.saturating_add(1);
        let snap = self.snapshot();
        tracing::info!(
            id = id,
            completed = snap.succeeded,
            failed = snap.failed,
            expected = snap.expected,
            progress_pct = format!("{:.1}%", snap.percent()),
            elapsed_secs = snap.elapsed.as_secs(),
            "Generated historical example"
        );
    }

    /// Count a skipped item. The completion counter does not move.
    pub fn record_failure(&mut self) {
        self.failed = self.failed.saturating_add(1);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            expected: self.expected,
            succeeded: self.succeeded,
            failed: self.failed,
            elapsed: self.started.elapsed(),
        }
    }
}
