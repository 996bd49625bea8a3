use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::findings::{SecurityFinding, UtilizationFinding};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceFindings<T> {
    pub instance_id: String,
    pub issues: Vec<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditFindings {
    pub security_issues: Vec<InstanceFindings<SecurityFinding>>,
    pub utilization_issues: Vec<InstanceFindings<UtilizationFinding>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditSummary {
    pub total_instances: usize,
    pub instances_with_security_issues: usize,
    pub instances_with_utilization_issues: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditReport {
    pub audit_timestamp: String,
    pub findings: AuditFindings,
    pub summary: AuditSummary,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Collects per-instance evaluator output in listing order.
///
/// Each category counter moves at most once per instance, so the summary
/// counts instances with findings rather than findings.
#[derive(Debug, Default)]
pub struct AuditReportBuilder {
    total_instances: usize,
    findings: AuditFindings,
    summary: AuditSummary,
}

impl AuditReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_instance(
        &mut self,
        instance_id: &str,
        security_issues: Vec<SecurityFinding>,
        utilization_issues: Vec<UtilizationFinding>,
    ) {
        self.total_instances += 1;

        if !security_issues.is_empty() {
            self.findings.security_issues.push(InstanceFindings {
                instance_id: instance_id.to_string(),
                issues: security_issues,
            });
            self.summary.instances_with_security_issues += 1;
        }

        if !utilization_issues.is_empty() {
            self.findings.utilization_issues.push(InstanceFindings {
                instance_id: instance_id.to_string(),
                issues: utilization_issues,
            });
            self.summary.instances_with_utilization_issues += 1;
        }
    }

    pub fn finish(self, built_at: DateTime<Utc>) -> AuditReport {
        AuditReport {
            audit_timestamp: format_timestamp(built_at),
            findings: self.findings,
            summary: AuditSummary {
                total_instances: self.total_instances,
                ..self.summary
            },
        }
    }
}
