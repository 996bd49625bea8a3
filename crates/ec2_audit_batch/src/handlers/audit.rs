use ec2_audit_core::findings::{
    check_instance_utilization, security_findings_for_rules, SecurityFinding,
};
use ec2_audit_core::inventory::InstanceDescription;
use ec2_audit_core::report::{AuditReport, AuditReportBuilder};
use tracing::{error, info, warn};

use crate::adapters::clock::Clock;
use crate::adapters::compute::SecurityGroupRuleSource;

/// SSH/RDP exposure across every group attached to the instance, in group
/// order. A group whose rules cannot be read contributes nothing.
pub fn check_security_groups(
    rules: &dyn SecurityGroupRuleSource,
    instance: &InstanceDescription,
) -> Vec<SecurityFinding> {
    let mut findings = Vec::new();

    for group in &instance.security_groups {
        match rules.describe_group_rules(&group.group_id) {
            Ok(group_rules) => {
                let group_findings = security_findings_for_rules(&group.group_id, &group_rules);
                if !group_findings.is_empty() {
                    warn!(
                        component = "audit",
                        instance_id = %instance.instance_id,
                        group_id = %group.group_id,
                        group_name = group.group_name.as_deref().unwrap_or_default(),
                        exposed_rules = group_findings.len(),
                        "security group exposes admin ports to 0.0.0.0/0"
                    );
                }
                findings.extend(group_findings);
            }
            Err(error) => {
                error!(
                    component = "audit",
                    instance_id = %instance.instance_id,
                    group_id = %group.group_id,
                    "Error checking security group {}: {error}",
                    group.group_id
                );
            }
        }
    }

    findings
}

/// Runs both evaluators over every instance in listing order. The report is
/// stamped when it is built, not when the job started.
pub fn build_audit_report(
    rules: &dyn SecurityGroupRuleSource,
    instances: &[InstanceDescription],
    clock: &dyn Clock,
) -> AuditReport {
    info!(
        component = "audit",
        instance_count = instances.len(),
        "Generating EC2 audit report..."
    );

    let mut builder = AuditReportBuilder::new();
    for instance in instances {
        let security_issues = check_security_groups(rules, instance);
        let utilization_issues = check_instance_utilization(instance);
        if !utilization_issues.is_empty() {
            let volumes: Vec<&str> = instance
                .block_device_mappings
                .iter()
                .map(|mapping| mapping.device_name.as_str())
                .collect();
            info!(
                component = "audit",
                instance_id = %instance.instance_id,
                instance_type = %instance.instance_type,
                ?volumes,
                issues = utilization_issues.len(),
                "instance has utilization findings"
            );
        }
        builder.record_instance(&instance.instance_id, security_issues, utilization_issues);
    }

    let report = builder.finish(clock.now());
    info!(
        component = "audit",
        total_instances = report.summary.total_instances,
        instances_with_security_issues = report.summary.instances_with_security_issues,
        instances_with_utilization_issues = report.summary.instances_with_utilization_issues,
        "audit report built"
    );
    report
}
