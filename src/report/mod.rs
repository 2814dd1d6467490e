//! Human-readable and JSON renderings of a [`RunSummary`].
use std::time::Duration;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::pipeline::RunSummary;


const AVERAGE_NOTE: &str = "wall-clock / connections, not a per-request latency";

/// Renders the run summary in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(summary: &RunSummary, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(text_report(summary)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport::from(summary))?),
    }
}

#[must_use]
pub fn text_report(summary: &RunSummary) -> String {
    let average = summary.average().map_or_else(
        || "n/a".to_owned(),
        |average| format!("{:?} ({})", average, AVERAGE_NOTE),
    );
    let mut lines = vec![
        format!("Connections:\t{}", summary.completed),
        format!("Failures:\t{}", summary.failures),
        format!("Concurrent:\t{}", summary.concurrency),
        format!("Total size:\t{} bytes", summary.total_bytes),
        format!("Total time:\t{:?}", summary.elapsed),
        format!("Average time:\t{}", average),
    ];
    if summary.cancelled {
        lines.push(format!(
            "Cancelled:\tyes ({} of {} requests observed)",
            summary.completed, summary.requested
        ));
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct JsonReport {
    started_at: String,
    requested: u64,
    completed: u64,
    failures: u64,
    concurrency: usize,
    total_bytes: u64,
    elapsed_us: u64,
    /// Wall-clock / completed; see `AVERAGE_NOTE`.
    average_us: Option<u64>,
    average_note: &'static str,
    cancelled: bool,
}

impl From<&RunSummary> for JsonReport {
    fn from(summary: &RunSummary) -> Self {
        Self {
            started_at: summary.started_at.to_rfc3339(),
            requested: summary.requested,
            completed: summary.completed,
            failures: summary.failures,
            concurrency: summary.concurrency,
            total_bytes: summary.total_bytes,
            elapsed_us: micros(summary.elapsed),
            average_us: summary.average().map(micros),
            average_note: AVERAGE_NOTE,
            cancelled: summary.cancelled,
        }
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
