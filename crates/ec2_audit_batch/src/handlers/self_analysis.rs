use ec2_audit_core::log_analysis::{
    analyze_events, select_latest_stream, LogAnalysisOutcome, NO_STREAM_MESSAGE,
};
use tracing::{error, info, warn};

use crate::adapters::clock::Clock;
use crate::adapters::logs::LogStreamSource;

/// Analyzes the newest log stream named after `job_id`.
///
/// A missing stream and any provider failure both come back as
/// [`LogAnalysisOutcome::Unavailable`]; this never fails the job.
pub fn analyze_own_logs(
    logs: &dyn LogStreamSource,
    log_group: &str,
    job_id: &str,
    clock: &dyn Clock,
) -> LogAnalysisOutcome {
    let streams = match logs.list_streams(log_group, job_id) {
        Ok(streams) => streams,
        Err(error) => {
            error!(
                component = "self_analysis",
                log_group = %log_group,
                "Error during self-analysis of logs: {error}"
            );
            return LogAnalysisOutcome::unavailable(error.to_string());
        }
    };

    let Some(stream) = select_latest_stream(&streams) else {
        warn!(
            component = "self_analysis",
            log_group = %log_group,
            stream_prefix = %job_id,
            "no log stream matches the job id"
        );
        return LogAnalysisOutcome::unavailable(NO_STREAM_MESSAGE);
    };
    info!(
        component = "self_analysis",
        candidates = streams.len(),
        "Found own log stream: {}",
        stream.name
    );

    match logs.fetch_events(log_group, &stream.name) {
        Ok(events) => {
            let analysis = analyze_events(&events, clock.now());
            info!(
                component = "self_analysis",
                total_log_events = analysis.total_log_events,
                error_count = analysis.error_count,
                warning_count = analysis.warning_count,
                successful_completion = analysis.successful_completion,
                "log analysis complete"
            );
            LogAnalysisOutcome::Completed(analysis)
        }
        Err(error) => {
            error!(
                component = "self_analysis",
                stream = %stream.name,
                "Error during self-analysis of logs: {error}"
            );
            LogAnalysisOutcome::unavailable(error.to_string())
        }
    }
}
