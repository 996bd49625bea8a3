use tracing::warn;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

pub const FALLBACK_FILTER: &str = "info";

/// Installs the process-wide subscriber. Output goes to stdout, which the batch
/// platform ships to the job's log stream.
pub fn init_logging(format: LogFormat, directive: &str) {
    let (filter, rejected) = parse_filter(directive);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_ansi(false).init(),
    }

    if let Some(error) = rejected {
        warn!(
            component = "telemetry",
            directive = %directive,
            "invalid log filter, falling back to {FALLBACK_FILTER}: {error}"
        );
    }
}

/// The filter for `directive`, or the fallback plus the parse error.
pub fn parse_filter(directive: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(FALLBACK_FILTER), Some(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_crate_level_directives() {
        let (_, rejected) = parse_filter("info,ec2_audit_batch=debug");
        assert!(rejected.is_none());
    }

    #[test]
    fn reports_unparseable_level() {
        let (_, rejected) = parse_filter("ec2_audit_batch=chatty");
        assert!(rejected.is_some());
    }
}
