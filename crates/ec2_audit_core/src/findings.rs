use serde::{Deserialize, Serialize};

use crate::inventory::{InstanceDescription, InstanceState, SecurityGroupRule};

pub const SSH_PORT: i32 = 22;
pub const RDP_PORT: i32 = 3389;
pub const UNRESTRICTED_IPV4_CIDR: &str = "0.0.0.0/0";
pub const FREE_TIER_INSTANCE_TYPES: [&str; 3] = ["t2.micro", "t3.micro", "t4g.micro"];

const TCP_PROTOCOL_NUMBER: &str = "6";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityFinding {
    #[serde(rename = "SecurityGroupId")]
    pub security_group_id: String,
    #[serde(rename = "Port")]
    pub port: i32,
    #[serde(rename = "Protocol")]
    pub protocol: String,
    #[serde(rename = "CIDR")]
    pub cidr: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilizationIssueKind {
    StoppedInstance,
    NonFreeTierType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtilizationFinding {
    pub issue: UtilizationIssueKind,
    pub message: String,
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_type: Option<String>,
}

/// True when the rule opens SSH or RDP over TCP to every IPv4 address.
pub fn is_exposed_admin_rule(rule: &SecurityGroupRule) -> bool {
    let is_tcp = rule.ip_protocol.as_deref().is_some_and(|protocol| {
        protocol.eq_ignore_ascii_case("tcp") || protocol == TCP_PROTOCOL_NUMBER
    });
    let is_admin_port = matches!(rule.from_port, Some(SSH_PORT) | Some(RDP_PORT));
    let is_unrestricted = rule
        .cidr_ipv4
        .as_deref()
        .is_some_and(|cidr| cidr.trim() == UNRESTRICTED_IPV4_CIDR);

    is_tcp && is_admin_port && is_unrestricted
}

/// Findings for one group's rules, in rule order.
pub fn security_findings_for_rules(
    group_id: &str,
    rules: &[SecurityGroupRule],
) -> Vec<SecurityFinding> {
    rules
        .iter()
        .filter(|rule| is_exposed_admin_rule(rule))
        .filter_map(|rule| {
            Some(SecurityFinding {
                security_group_id: group_id.to_string(),
                port: rule.from_port?,
                protocol: rule.ip_protocol.clone()?,
                cidr: rule.cidr_ipv4.clone()?,
            })
        })
        .collect()
}

pub fn is_free_tier_type(instance_type: &str) -> bool {
    FREE_TIER_INSTANCE_TYPES.contains(&instance_type)
}

/// Cost heuristics that need nothing beyond the instance record.
///
/// Both checks run unconditionally; their lifecycle predicates are what keep
/// them from firing together.
pub fn check_instance_utilization(instance: &InstanceDescription) -> Vec<UtilizationFinding> {
    let mut findings = Vec::new();

    if instance.state == InstanceState::Stopped && !instance.block_device_mappings.is_empty() {
        findings.push(UtilizationFinding {
            issue: UtilizationIssueKind::StoppedInstance,
            message: "Instance is stopped but still incurring EBS storage costs".to_string(),
            instance_id: instance.instance_id.clone(),
            current_type: None,
        });
    }

    if instance.state == InstanceState::Running && !is_free_tier_type(&instance.instance_type) {
        findings.push(UtilizationFinding {
            issue: UtilizationIssueKind::NonFreeTierType,
            message: format!(
                "Instance type {} may incur costs. Free tier types: {}",
                instance.instance_type,
                FREE_TIER_INSTANCE_TYPES.join(", ")
            ),
            instance_id: instance.instance_id.clone(),
            current_type: Some(instance.instance_type.clone()),
        });
    }

    findings
}
