//! Shared EC2 audit domain primitives.
//!
//! This crate owns the audit rules, report shapes and object-key layout. It
//! intentionally excludes AWS SDK and async runtime concerns; the
//! `ec2_audit_batch` crate feeds it plain values fetched from the provider.

pub mod final_report;
pub mod findings;
pub mod inventory;
pub mod log_analysis;
pub mod report;
pub mod storage_keys;
pub mod summary;
