use chrono::{DateTime, Utc};

pub const REPORT_KEY_PREFIX: &str = "audit-reports";
pub const REPORT_KEY_STEM: &str = "ec2-audit";
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    AuditReport,
    MarkdownSummary,
    FinalReport,
}

impl ArtifactKind {
    pub fn key_suffix(self) -> &'static str {
        match self {
            Self::AuditReport => "report.json",
            Self::MarkdownSummary => "summary.md",
            Self::FinalReport => "final-combined-report.json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::AuditReport | Self::FinalReport => "application/json",
            Self::MarkdownSummary => "text/markdown",
        }
    }
}

/// Keys carry second resolution, so two writes of the same suffix within one
/// second share a key.
pub fn report_object_key(written_at: DateTime<Utc>, suffix: &str) -> String {
    format!(
        "{REPORT_KEY_PREFIX}/{REPORT_KEY_STEM}-{}-{}",
        written_at.format(KEY_TIMESTAMP_FORMAT),
        suffix.trim_start_matches('-'),
    )
}

pub fn artifact_object_key(written_at: DateTime<Utc>, artifact: ArtifactKind) -> String {
    report_object_key(written_at, artifact.key_suffix())
}
