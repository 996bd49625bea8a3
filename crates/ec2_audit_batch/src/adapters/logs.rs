use ec2_audit_core::log_analysis::{LogEvent, LogStreamSummary};

use super::ProviderError;

pub trait LogStreamSource {
    fn list_streams(
        &self,
        log_group: &str,
        stream_prefix: &str,
    ) -> Result<Vec<LogStreamSummary>, ProviderError>;

    /// Events of one stream, newest first.
    fn fetch_events(&self, log_group: &str, stream_name: &str)
        -> Result<Vec<LogEvent>, ProviderError>;
}

/// Turns one page of messages in API order (oldest first) into the newest
/// first order [`LogStreamSource::fetch_events`] promises. A missing message
/// becomes an empty event.
pub fn newest_first<'a, I>(messages: I) -> Vec<LogEvent>
where
    I: DoubleEndedIterator<Item = Option<&'a str>>,
{
    messages
        .rev()
        .map(|message| LogEvent {
            message: message.unwrap_or_default().to_string(),
        })
        .collect()
}
