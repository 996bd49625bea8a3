use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::format_timestamp;

pub const ERROR_MARKER: &str = "ERROR";
/// `tracing` prints its warn level as `WARN`, so the job's own warnings do
/// not match.
pub const WARNING_MARKER: &str = "WARNING";
pub const COMPLETION_MARKER: &str = "FINAL JOB SUMMARY";
pub const NO_STREAM_MESSAGE: &str = "No log stream found for self-analysis.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamSummary {
    pub name: String,
    pub last_event_timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogAnalysis {
    pub log_analysis_timestamp: String,
    pub total_log_events: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub first_log_event: Option<String>,
    pub last_log_event: Option<String>,
    pub successful_completion: bool,
}

/// Either counters derived from the stream, or the reason there are none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LogAnalysisOutcome {
    Completed(LogAnalysis),
    Unavailable { error: String },
}

impl LogAnalysisOutcome {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    pub fn successful_completion(&self) -> bool {
        match self {
            Self::Completed(analysis) => analysis.successful_completion,
            Self::Unavailable { .. } => false,
        }
    }
}

/// Picks the stream with the newest event. Streams that never received an
/// event rank last; ties keep listing order.
pub fn select_latest_stream(streams: &[LogStreamSummary]) -> Option<&LogStreamSummary> {
    streams.iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) if candidate.last_event_timestamp > current.last_event_timestamp => {
            Some(candidate)
        }
        Some(current) => Some(current),
    })
}

/// `events` must be ordered newest first: the head is the chronologically
/// last event and the tail the first.
pub fn analyze_events(events: &[LogEvent], analyzed_at: DateTime<Utc>) -> LogAnalysis {
    let count_containing = |marker: &str| {
        events
            .iter()
            .filter(|event| event.message.contains(marker))
            .count()
    };

    LogAnalysis {
        log_analysis_timestamp: format_timestamp(analyzed_at),
        total_log_events: events.len(),
        error_count: count_containing(ERROR_MARKER),
        warning_count: count_containing(WARNING_MARKER),
        first_log_event: events.last().map(|event| event.message.clone()),
        last_log_event: events.first().map(|event| event.message.clone()),
        successful_completion: events
            .iter()
            .any(|event| event.message.contains(COMPLETION_MARKER)),
    }
}
