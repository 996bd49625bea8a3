//! Capability traits for every provider service the job touches.
//!
//! Handlers only see these traits; the binary implements them with the AWS
//! SDK and tests implement them in memory.

use std::fmt::Display;

pub mod clock;
pub mod compute;
pub mod logs;
pub mod object_store;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct ProviderError {
    pub operation: &'static str,
    pub message: String,
}

impl ProviderError {
    pub fn new(operation: &'static str, error: impl Display) -> Self {
        Self {
            operation,
            message: error.to_string(),
        }
    }
}
