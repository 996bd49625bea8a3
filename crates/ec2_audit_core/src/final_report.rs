use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::log_analysis::LogAnalysisOutcome;
use crate::report::{format_timestamp, AuditSummary};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Success,
    AnalysisCompletedWithWarnings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationalMetrics {
    pub start_time: String,
    pub end_time: String,
    pub log_analysis: LogAnalysisOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalReport {
    pub job_id: String,
    pub execution_duration_seconds: f64,
    pub audit_summary: AuditSummary,
    pub operational_metrics: OperationalMetrics,
    pub status: JobStatus,
}

impl FinalReport {
    pub fn assemble(
        job_id: &str,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        audit_summary: AuditSummary,
        log_analysis: LogAnalysisOutcome,
    ) -> Self {
        let status = if log_analysis.successful_completion() {
            JobStatus::Success
        } else {
            JobStatus::AnalysisCompletedWithWarnings
        };

        Self {
            job_id: job_id.to_string(),
            execution_duration_seconds: elapsed_seconds(started_at, finished_at),
            audit_summary,
            operational_metrics: OperationalMetrics {
                start_time: format_timestamp(started_at),
                end_time: format_timestamp(finished_at),
                log_analysis,
            },
            status,
        }
    }
}

/// Wall-clock seconds rounded to hundredths; a clock that steps backwards
/// yields zero.
pub fn elapsed_seconds(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> f64 {
    let millis = finished_at
        .signed_duration_since(started_at)
        .num_milliseconds()
        .max(0);
    (millis as f64 / 10.0).round() / 100.0
}
