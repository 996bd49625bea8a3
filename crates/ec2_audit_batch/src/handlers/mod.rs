//! Sequential job stages. Every stage degrades to an empty or absent result on
//! provider failure instead of returning an error.

pub mod audit;
pub mod inventory;
pub mod job;
pub mod publish;
pub mod self_analysis;
