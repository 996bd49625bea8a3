use ec2_audit_core::inventory::{flatten_reservations, InstanceDescription};
use tracing::{error, info};

use crate::adapters::compute::InstanceDirectory;

/// Every instance visible to the caller, across all listing pages.
///
/// A failure on any page discards what was gathered and yields an empty list,
/// so a failed listing reads the same as an empty fleet downstream.
pub fn list_instances(directory: &dyn InstanceDirectory) -> Vec<InstanceDescription> {
    info!(component = "inventory", "Fetching EC2 instances...");

    let mut instances = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = match directory.describe_instances(next_token.as_deref()) {
            Ok(page) => page,
            Err(error) => {
                error!(
                    component = "inventory",
                    operation = error.operation,
                    pages_read = pages,
                    "Error fetching EC2 instances: {error}"
                );
                return Vec::new();
            }
        };
        pages += 1;
        instances.extend(flatten_reservations(page.reservations));

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    info!(
        component = "inventory",
        instance_count = instances.len(),
        pages,
        "Found {} EC2 instances.",
        instances.len()
    );
    instances
}
