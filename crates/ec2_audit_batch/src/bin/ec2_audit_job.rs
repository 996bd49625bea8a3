use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::Filter;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use clap::Parser;
use ec2_audit_batch::adapters::clock::{Pause, SystemClock};
use ec2_audit_batch::adapters::compute::{InstanceDirectory, SecurityGroupRuleSource};
use ec2_audit_batch::adapters::logs::{newest_first, LogStreamSource};
use ec2_audit_batch::adapters::object_store::ReportStore;
use ec2_audit_batch::adapters::ProviderError;
use ec2_audit_batch::config::JobConfig;
use ec2_audit_batch::handlers::job::{run_job, JobServices};
use ec2_audit_batch::telemetry::init_logging;
use ec2_audit_core::inventory::{
    BlockDeviceMapping, InstanceDescription, InstanceState, Reservation, ReservationPage,
    SecurityGroupRef, SecurityGroupRule,
};
use ec2_audit_core::log_analysis::{LogEvent, LogStreamSummary};
use tracing::{info, warn};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

struct Ec2Compute {
    ec2_client: aws_sdk_ec2::Client,
}

impl InstanceDirectory for Ec2Compute {
    fn describe_instances(
        &self,
        next_token: Option<&str>,
    ) -> Result<ReservationPage, ProviderError> {
        let client = self.ec2_client.clone();
        let token = next_token.map(str::to_string);

        let output = block_on(async move {
            client
                .describe_instances()
                .set_next_token(token)
                .send()
                .await
        })
        .map_err(|error| ProviderError::new("DescribeInstances", DisplayErrorContext(&error)))?;

        Ok(ReservationPage {
            reservations: output
                .reservations()
                .iter()
                .map(|reservation| Reservation {
                    instances: reservation
                        .instances()
                        .iter()
                        .filter_map(instance_description)
                        .collect(),
                })
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

impl SecurityGroupRuleSource for Ec2Compute {
    fn describe_group_rules(
        &self,
        group_id: &str,
    ) -> Result<Vec<SecurityGroupRule>, ProviderError> {
        let client = self.ec2_client.clone();
        let filter = Filter::builder().name("group-id").values(group_id).build();

        let pages = block_on(async move {
            client
                .describe_security_group_rules()
                .filters(filter)
                .into_paginator()
                .send()
                .collect::<Result<Vec<_>, _>>()
                .await
        })
        .map_err(|error| {
            ProviderError::new("DescribeSecurityGroupRules", DisplayErrorContext(&error))
        })?;

        Ok(pages
            .iter()
            .flat_map(|page| page.security_group_rules())
            .map(|rule| SecurityGroupRule {
                ip_protocol: rule.ip_protocol().map(str::to_string),
                from_port: rule.from_port(),
                cidr_ipv4: rule.cidr_ipv4().map(str::to_string),
            })
            .collect())
    }
}

fn instance_description(instance: &aws_sdk_ec2::types::Instance) -> Option<InstanceDescription> {
    let Some(instance_id) = instance.instance_id() else {
        warn!(component = "inventory", "skipping instance record without an id");
        return None;
    };

    Some(InstanceDescription {
        instance_id: instance_id.to_string(),
        state: instance
            .state()
            .and_then(|state| state.name())
            .map(|name| InstanceState::from_name(name.as_str()))
            .unwrap_or_else(|| InstanceState::Other("unknown".to_string())),
        instance_type: instance
            .instance_type()
            .map(|instance_type| instance_type.as_str().to_string())
            .unwrap_or_default(),
        block_device_mappings: instance
            .block_device_mappings()
            .iter()
            .map(|mapping| BlockDeviceMapping {
                device_name: mapping.device_name().unwrap_or_default().to_string(),
            })
            .collect(),
        security_groups: instance
            .security_groups()
            .iter()
            .filter_map(|group| {
                Some(SecurityGroupRef {
                    group_id: group.group_id()?.to_string(),
                    group_name: group.group_name().map(str::to_string),
                })
            })
            .collect(),
    })
}

struct S3ReportStore {
    s3_client: aws_sdk_s3::Client,
}

impl ReportStore for S3ReportStore {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ProviderError> {
        let client = self.s3_client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();
        let content_type = content_type.to_string();

        block_on(async move {
            client
                .put_object()
                .bucket(bucket)
                .key(object_key)
                .body(ByteStream::from(body_bytes))
                .content_type(content_type)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| ProviderError::new("PutObject", DisplayErrorContext(&error)))
    }
}

struct CloudWatchLogStreams {
    logs_client: aws_sdk_cloudwatchlogs::Client,
}

impl LogStreamSource for CloudWatchLogStreams {
    // Ordering by last event time cannot be combined with a name prefix, so
    // every matching stream is listed and the caller picks the newest.
    fn list_streams(
        &self,
        log_group: &str,
        stream_prefix: &str,
    ) -> Result<Vec<LogStreamSummary>, ProviderError> {
        let client = self.logs_client.clone();
        let log_group = log_group.to_string();
        let stream_prefix = stream_prefix.to_string();

        let pages = block_on(async move {
            client
                .describe_log_streams()
                .log_group_name(log_group)
                .log_stream_name_prefix(stream_prefix)
                .into_paginator()
                .send()
                .collect::<Result<Vec<_>, _>>()
                .await
        })
        .map_err(|error| ProviderError::new("DescribeLogStreams", DisplayErrorContext(&error)))?;

        Ok(pages
            .iter()
            .flat_map(|page| page.log_streams())
            .filter_map(|stream| {
                Some(LogStreamSummary {
                    name: stream.log_stream_name()?.to_string(),
                    last_event_timestamp: stream.last_event_timestamp(),
                })
            })
            .collect())
    }

    fn fetch_events(
        &self,
        log_group: &str,
        stream_name: &str,
    ) -> Result<Vec<LogEvent>, ProviderError> {
        let client = self.logs_client.clone();
        let log_group = log_group.to_string();
        let stream_name = stream_name.to_string();

        let output = block_on(async move {
            client
                .get_log_events()
                .log_group_name(log_group)
                .log_stream_name(stream_name)
                .start_from_head(false)
                .send()
                .await
        })
        .map_err(|error| ProviderError::new("GetLogEvents", DisplayErrorContext(&error)))?;

        Ok(newest_first(output.events().iter().map(|event| event.message())))
    }
}

struct TokioPause;

impl Pause for TokioPause {
    fn pause(&self, duration: Duration) {
        block_on(tokio::time::sleep(duration));
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = JobConfig::parse();
    init_logging(config.log_format, &config.log_filter);
    let settings = config.settings();

    info!(
        component = "job",
        region = %config.region,
        "Initializing AWS clients in region: {}",
        config.region
    );
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let compute = Ec2Compute {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let store = S3ReportStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let logs = CloudWatchLogStreams {
        logs_client: aws_sdk_cloudwatchlogs::Client::new(&aws_config),
    };

    let run = run_job(
        &settings,
        &JobServices {
            instances: &compute,
            rules: &compute,
            store: &store,
            logs: &logs,
            clock: &SystemClock,
            pause: &TokioPause,
        },
    );

    info!(
        component = "job",
        status = ?run.final_report.status,
        published = ?run.artifacts,
        "exiting"
    );
    ExitCode::SUCCESS
}
