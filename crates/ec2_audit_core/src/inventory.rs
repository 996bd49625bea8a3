#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Other(String),
}

impl InstanceState {
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDeviceMapping {
    pub device_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupRef {
    pub group_id: String,
    pub group_name: Option<String>,
}

/// The subset of a provider instance record the audit reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescription {
    pub instance_id: String,
    pub state: InstanceState,
    pub instance_type: String,
    pub block_device_mappings: Vec<BlockDeviceMapping>,
    pub security_groups: Vec<SecurityGroupRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub instances: Vec<InstanceDescription>,
}

/// One page of the instance listing API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPage {
    pub reservations: Vec<Reservation>,
    pub next_token: Option<String>,
}

/// A single ingress or egress rule attached to a security group. Only the
/// fields the exposure check reads are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupRule {
    pub ip_protocol: Option<String>,
    pub from_port: Option<i32>,
    pub cidr_ipv4: Option<String>,
}

pub fn flatten_reservations(reservations: Vec<Reservation>) -> Vec<InstanceDescription> {
    reservations
        .into_iter()
        .flat_map(|reservation| reservation.instances)
        .collect()
}
