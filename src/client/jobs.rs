//! Blocking poll loop shared by every asynchronous remote job
//! (content export, dashboard report rendering).

use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ExportError, ExportResult};

/// Interval and deadline for one poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// 1s interval, 30s deadline
    pub fn export_default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

/// Status reported by one poll of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusReport {
    pub status: String,
    pub message: String,
}

/// Final state of a settled job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub ok: bool,
    pub message: String,
}

/// Poll `status_fn` until it reports `success_value` or `failure_value`.
///
/// Status values compare case-insensitively. The deadline is checked before
/// every poll; once it has passed the loop stops with `ExportError::Timeout`.
/// Errors returned by `status_fn` end the loop immediately.
pub fn wait_for_job<F>(
    what: &str,
    mut status_fn: F,
    success_value: &str,
    failure_value: &str,
    settings: PollSettings,
) -> ExportResult<JobOutcome>
where
    F: FnMut() -> ExportResult<JobStatusReport>,
{
    let start = Instant::now();

    loop {
        if start.elapsed() > settings.timeout {
            return Err(ExportError::Timeout {
                what: what.to_string(),
                after: settings.timeout,
            });
        }

        let report = status_fn()?;

        if report.status.eq_ignore_ascii_case(success_value) {
            return Ok(JobOutcome {
                ok: true,
                message: "success".to_string(),
            });
        }

        if report.status.eq_ignore_ascii_case(failure_value) {
            return Ok(JobOutcome {
                ok: false,
                message: report.message,
            });
        }

        thread::sleep(settings.interval);
    }
}
