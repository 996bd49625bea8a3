//! AWS-oriented adapters and handlers for the EC2 audit batch job.
//!
//! This crate owns runtime integration details (capability traits for each
//! provider service, the sequential job handlers, configuration and logging)
//! and leaves audit rules and report shapes to `ec2_audit_core`. The AWS SDK
//! implementations of the adapters live in the `ec2_audit_job` binary.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
