use ec2_audit_core::storage_keys::{artifact_object_key, ArtifactKind};
use serde::Serialize;
use tracing::{error, info};

use crate::adapters::clock::Clock;
use crate::adapters::object_store::ReportStore;

/// Target of every publish call in one run.
pub struct ReportPublisher<'a> {
    pub store: &'a dyn ReportStore,
    pub clock: &'a dyn Clock,
    pub bucket: &'a str,
}

impl ReportPublisher<'_> {
    /// Writes `body` under a freshly timestamped key for `artifact`. Returns
    /// the key, or `None` when the write failed.
    pub fn publish_artifact(&self, artifact: ArtifactKind, body: &[u8]) -> Option<String> {
        let key = artifact_object_key(self.clock.now(), artifact);
        self.put(key, body, artifact.content_type())
    }

    /// Pretty-printed JSON rendition of `content`.
    pub fn publish_json(&self, artifact: ArtifactKind, content: &impl Serialize) -> Option<String> {
        match serde_json::to_vec_pretty(content) {
            Ok(body) => self.publish_artifact(artifact, &body),
            Err(error) => {
                error!(
                    component = "publisher",
                    suffix = artifact.key_suffix(),
                    "Error serializing report: {error}"
                );
                None
            }
        }
    }

    fn put(&self, key: String, body: &[u8], content_type: &str) -> Option<String> {
        match self.store.put_object(self.bucket, &key, body, content_type) {
            Ok(()) => {
                info!(
                    component = "publisher",
                    bucket = %self.bucket,
                    bytes = body.len(),
                    "Uploaded to S3: {key}"
                );
                Some(key)
            }
            Err(error) => {
                error!(
                    component = "publisher",
                    bucket = %self.bucket,
                    key = %key,
                    "Error uploading to S3: {error}"
                );
                None
            }
        }
    }
}
