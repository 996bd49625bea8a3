use ec2_audit_core::final_report::FinalReport;
use ec2_audit_core::log_analysis::COMPLETION_MARKER;
use ec2_audit_core::report::AuditReport;
use ec2_audit_core::storage_keys::ArtifactKind;
use ec2_audit_core::summary::render_markdown_summary;
use tracing::{error, info, warn};

use crate::adapters::clock::{Clock, Pause};
use crate::adapters::compute::{InstanceDirectory, SecurityGroupRuleSource};
use crate::adapters::logs::LogStreamSource;
use crate::adapters::object_store::ReportStore;
use crate::config::JobSettings;
use crate::handlers::audit::build_audit_report;
use crate::handlers::inventory::list_instances;
use crate::handlers::publish::ReportPublisher;
use crate::handlers::self_analysis::analyze_own_logs;

pub struct JobServices<'a> {
    pub instances: &'a dyn InstanceDirectory,
    pub rules: &'a dyn SecurityGroupRuleSource,
    pub store: &'a dyn ReportStore,
    pub logs: &'a dyn LogStreamSource,
    pub clock: &'a dyn Clock,
    pub pause: &'a dyn Pause,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedArtifacts {
    pub audit_report: Option<String>,
    pub markdown_summary: Option<String>,
    pub final_report: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JobRun {
    pub audit_report: AuditReport,
    pub final_report: FinalReport,
    pub artifacts: PublishedArtifacts,
}

/// Audit, publish, wait for log ingestion, analyze own logs, publish the
/// combined report. Sub-failures shape the report content; nothing here
/// aborts the run.
pub fn run_job(settings: &JobSettings, services: &JobServices<'_>) -> JobRun {
    let started_at = services.clock.now();
    info!(
        component = "job",
        job_id = %settings.job_id,
        bucket = %settings.bucket,
        "Starting combined EC2 audit and self-analysis job"
    );

    let publisher = ReportPublisher {
        store: services.store,
        clock: services.clock,
        bucket: &settings.bucket,
    };

    let instances = list_instances(services.instances);
    let audit_report = build_audit_report(services.rules, &instances, services.clock);

    let mut artifacts = PublishedArtifacts {
        audit_report: publisher.publish_json(ArtifactKind::AuditReport, &audit_report),
        ..PublishedArtifacts::default()
    };
    let markdown = render_markdown_summary(&audit_report, &settings.job_id);
    artifacts.markdown_summary =
        publisher.publish_artifact(ArtifactKind::MarkdownSummary, markdown.as_bytes());

    info!(
        component = "job",
        delay_secs = settings.log_ingestion_delay.as_secs(),
        "Beginning self-analysis via CloudWatch Logs..."
    );
    services.pause.pause(settings.log_ingestion_delay);
    let log_analysis = analyze_own_logs(
        services.logs,
        &settings.log_group,
        &settings.job_id,
        services.clock,
    );

    let finished_at = services.clock.now();
    let final_report = FinalReport::assemble(
        &settings.job_id,
        started_at,
        finished_at,
        audit_report.summary,
        log_analysis,
    );
    artifacts.final_report = publisher.publish_json(ArtifactKind::FinalReport, &final_report);

    if artifacts.audit_report.is_none()
        || artifacts.markdown_summary.is_none()
        || artifacts.final_report.is_none()
    {
        warn!(component = "job", ?artifacts, "some reports were not published");
    }

    match serde_json::to_string_pretty(&final_report) {
        Ok(rendered) => info!(component = "job", "{COMPLETION_MARKER}: {rendered}"),
        Err(error) => error!(component = "job", "final report could not be rendered: {error}"),
    }
    info!(component = "job", "Combined audit and self-analysis job finished successfully.");

    JobRun {
        audit_report,
        final_report,
        artifacts,
    }
}
