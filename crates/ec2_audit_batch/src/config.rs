//! Command-line and environment configuration for the batch job.
//!
//! Every option can be supplied as a flag or through the environment the batch
//! platform injects; unset values fall back to the defaults below.

use std::time::Duration;

use clap::{Parser, ValueEnum};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_JOB_ID: &str = "local-test-job-id";
pub const DEFAULT_BUCKET: &str = "aws-batch-audit-reports";
pub const DEFAULT_LOG_GROUP: &str = "/aws/batch/job";
pub const DEFAULT_LOG_INGESTION_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Text,
}

/// Audit EC2 instances, publish the reports, then analyze this job's own logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "ec2_audit_job", version, about, long_about = None)]
pub struct JobConfig {
    /// Region whose instances are audited
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Identifier of this job run; also the log stream name prefix
    #[arg(long, env = "AWS_BATCH_JOB_ID", default_value = DEFAULT_JOB_ID)]
    pub job_id: String,

    /// Bucket receiving the published reports
    #[arg(long, env = "S3_BUCKET_NAME", default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Log group holding this job's log stream
    #[arg(long, env = "AWS_BATCH_LOG_GROUP_NAME", default_value = DEFAULT_LOG_GROUP)]
    pub log_group: String,

    /// Seconds to wait for log ingestion before self-analysis
    #[arg(
        long,
        env = "LOG_INGESTION_DELAY_SECS",
        default_value_t = DEFAULT_LOG_INGESTION_DELAY_SECS
    )]
    pub log_ingestion_delay_secs: u64,

    /// Diagnostic output format
    #[arg(long, value_enum, env = "AUDIT_LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

/// Values the job handlers need, free of CLI concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSettings {
    pub job_id: String,
    pub bucket: String,
    pub log_group: String,
    pub log_ingestion_delay: Duration,
}

impl JobConfig {
    pub fn settings(&self) -> JobSettings {
        JobSettings {
            job_id: self.job_id.trim().to_string(),
            bucket: self.bucket.trim().to_string(),
            log_group: self.log_group.trim().to_string(),
            log_ingestion_delay: Duration::from_secs(self.log_ingestion_delay_secs),
        }
    }
}
