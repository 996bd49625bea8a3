use crate::findings::UtilizationIssueKind;
use crate::report::AuditReport;

pub const SUMMARY_TITLE: &str = "# AWS EC2 Instance Audit Report";

/// Human-readable rendition of an audit report.
pub fn render_markdown_summary(report: &AuditReport, job_id: &str) -> String {
    let mut lines = vec![
        SUMMARY_TITLE.to_string(),
        format!("**Generated:** {}", report.audit_timestamp),
        format!("**Job ID:** {job_id}"),
        String::new(),
        "## Summary".to_string(),
        format!("- Total Instances: {}", report.summary.total_instances),
        format!(
            "- Instances with Security Issues: {}",
            report.summary.instances_with_security_issues
        ),
        format!(
            "- Instances with Utilization Issues: {}",
            report.summary.instances_with_utilization_issues
        ),
    ];

    if !report.findings.security_issues.is_empty() {
        lines.push(String::new());
        lines.push("## Security Findings".to_string());
        for entry in &report.findings.security_issues {
            lines.push(format!("- `{}`", entry.instance_id));
            for issue in &entry.issues {
                lines.push(format!(
                    "  - {} allows {}/{} from {}",
                    issue.security_group_id, issue.protocol, issue.port, issue.cidr
                ));
            }
        }
    }

    if !report.findings.utilization_issues.is_empty() {
        lines.push(String::new());
        lines.push("## Utilization Findings".to_string());
        for entry in &report.findings.utilization_issues {
            lines.push(format!("- `{}`", entry.instance_id));
            for issue in &entry.issues {
                lines.push(format!(
                    "  - {}: {}",
                    issue_label(issue.issue),
                    issue.message
                ));
            }
        }
    }

    lines.join("\n")
}

fn issue_label(kind: UtilizationIssueKind) -> &'static str {
    match kind {
        UtilizationIssueKind::StoppedInstance => "STOPPED_INSTANCE",
        UtilizationIssueKind::NonFreeTierType => "NON_FREE_TIER_TYPE",
    }
}
