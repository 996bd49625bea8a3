use ec2_audit_core::inventory::{ReservationPage, SecurityGroupRule};

use super::ProviderError;

pub trait InstanceDirectory {
    /// One page of reservations; pass the previous page's token to continue.
    fn describe_instances(
        &self,
        next_token: Option<&str>,
    ) -> Result<ReservationPage, ProviderError>;
}

pub trait SecurityGroupRuleSource {
    /// Every ingress and egress rule of the group.
    fn describe_group_rules(
        &self,
        group_id: &str,
    ) -> Result<Vec<SecurityGroupRule>, ProviderError>;
}
