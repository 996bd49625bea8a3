//! In-memory fakes for the capability traits.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use ec2_audit_core::inventory::{
    BlockDeviceMapping, InstanceDescription, InstanceState, Reservation, ReservationPage,
    SecurityGroupRef, SecurityGroupRule,
};
use ec2_audit_core::log_analysis::{LogEvent, LogStreamSummary};
use tracing_subscriber::fmt::MakeWriter;

use crate::adapters::clock::{Clock, Pause};
use crate::adapters::compute::{InstanceDirectory, SecurityGroupRuleSource};
use crate::adapters::logs::LogStreamSource;
use crate::adapters::object_store::ReportStore;
use crate::adapters::ProviderError;

pub fn instance(
    instance_id: &str,
    state: InstanceState,
    instance_type: &str,
    volumes: &[&str],
    groups: &[&str],
) -> InstanceDescription {
    InstanceDescription {
        instance_id: instance_id.to_string(),
        state,
        instance_type: instance_type.to_string(),
        block_device_mappings: volumes
            .iter()
            .map(|device_name| BlockDeviceMapping {
                device_name: device_name.to_string(),
            })
            .collect(),
        security_groups: groups
            .iter()
            .map(|group_id| SecurityGroupRef {
                group_id: group_id.to_string(),
                group_name: None,
            })
            .collect(),
    }
}

pub fn ingress_rule(protocol: &str, port: i32, cidr: &str) -> SecurityGroupRule {
    SecurityGroupRule {
        ip_protocol: Some(protocol.to_string()),
        from_port: Some(port),
        cidr_ipv4: Some(cidr.to_string()),
    }
}

pub fn fixed_time(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, hour, minute, second)
        .single()
        .expect("valid timestamp")
}

/// Serves pre-built pages keyed by the continuation token that requests them.
#[derive(Default)]
pub struct PagedDirectory {
    pages: HashMap<Option<String>, Result<ReservationPage, ProviderError>>,
    requested_tokens: RefCell<Vec<Option<String>>>,
}

impl PagedDirectory {
    pub fn single_page(instances: Vec<InstanceDescription>) -> Self {
        Self::default().with_page(
            None,
            Ok(ReservationPage {
                reservations: vec![Reservation { instances }],
                next_token: None,
            }),
        )
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::default().with_page(None, Err(error))
    }

    pub fn with_page(
        mut self,
        token: Option<&str>,
        page: Result<ReservationPage, ProviderError>,
    ) -> Self {
        self.pages.insert(token.map(str::to_string), page);
        self
    }

    pub fn requested_tokens(&self) -> Vec<Option<String>> {
        self.requested_tokens.borrow().clone()
    }
}

impl InstanceDirectory for PagedDirectory {
    fn describe_instances(
        &self,
        next_token: Option<&str>,
    ) -> Result<ReservationPage, ProviderError> {
        let key = next_token.map(str::to_string);
        self.requested_tokens.borrow_mut().push(key.clone());
        self.pages.get(&key).cloned().unwrap_or_else(|| {
            Err(ProviderError::new(
                "DescribeInstances",
                format!("unexpected token {key:?}"),
            ))
        })
    }
}

#[derive(Default)]
pub struct StaticRules {
    rules: HashMap<String, Result<Vec<SecurityGroupRule>, ProviderError>>,
    queried: RefCell<Vec<String>>,
}

impl StaticRules {
    pub fn with_group(mut self, group_id: &str, rules: Vec<SecurityGroupRule>) -> Self {
        self.rules.insert(group_id.to_string(), Ok(rules));
        self
    }

    pub fn with_failing_group(mut self, group_id: &str) -> Self {
        self.rules.insert(
            group_id.to_string(),
            Err(ProviderError::new(
                "DescribeSecurityGroupRules",
                format!("InvalidGroup.NotFound: {group_id}"),
            )),
        );
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.borrow().clone()
    }
}

impl SecurityGroupRuleSource for StaticRules {
    fn describe_group_rules(
        &self,
        group_id: &str,
    ) -> Result<Vec<SecurityGroupRule>, ProviderError> {
        self.queried.borrow_mut().push(group_id.to_string());
        self.rules
            .get(group_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct RecordingStore {
    writes: RefCell<Vec<StoredObject>>,
    denied_suffix: Option<&'static str>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denying(denied_suffix: &'static str) -> Self {
        Self {
            writes: RefCell::new(Vec::new()),
            denied_suffix: Some(denied_suffix),
        }
    }

    pub fn writes(&self) -> Vec<StoredObject> {
        self.writes.borrow().clone()
    }

    pub fn body_text(&self, key_suffix: &str) -> Option<String> {
        self.writes
            .borrow()
            .iter()
            .find(|object| object.key.ends_with(key_suffix))
            .map(|object| String::from_utf8_lossy(&object.body).into_owned())
    }
}

impl ReportStore for RecordingStore {
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ProviderError> {
        if self
            .denied_suffix
            .is_some_and(|suffix| key.ends_with(suffix))
        {
            return Err(ProviderError::new(
                "PutObject",
                format!("AccessDenied for key {key}"),
            ));
        }

        self.writes.borrow_mut().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: body.to_vec(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}

pub struct ScriptedLogs {
    streams: Vec<LogStreamSummary>,
    lookup_error: Option<ProviderError>,
    events: HashMap<String, Result<Vec<LogEvent>, ProviderError>>,
    prefixes: RefCell<Vec<String>>,
}

impl ScriptedLogs {
    pub fn without_streams() -> Self {
        Self {
            streams: Vec::new(),
            lookup_error: None,
            events: HashMap::new(),
            prefixes: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_lookup(error: ProviderError) -> Self {
        Self {
            lookup_error: Some(error),
            ..Self::without_streams()
        }
    }

    pub fn with_stream(
        mut self,
        name: &str,
        last_event_timestamp: i64,
        messages: &[&str],
    ) -> Self {
        self.streams.push(LogStreamSummary {
            name: name.to_string(),
            last_event_timestamp: Some(last_event_timestamp),
        });
        self.events.insert(
            name.to_string(),
            Ok(messages
                .iter()
                .map(|message| LogEvent {
                    message: message.to_string(),
                })
                .collect()),
        );
        self
    }

    pub fn with_failing_fetch(mut self, name: &str) -> Self {
        self.events.insert(
            name.to_string(),
            Err(ProviderError::new(
                "GetLogEvents",
                "ResourceNotFoundException: stream deleted",
            )),
        );
        self
    }

    pub fn requested_prefixes(&self) -> Vec<String> {
        self.prefixes.borrow().clone()
    }
}

impl LogStreamSource for ScriptedLogs {
    fn list_streams(
        &self,
        _log_group: &str,
        stream_prefix: &str,
    ) -> Result<Vec<LogStreamSummary>, ProviderError> {
        self.prefixes.borrow_mut().push(stream_prefix.to_string());
        if let Some(error) = &self.lookup_error {
            return Err(error.clone());
        }

        Ok(self
            .streams
            .iter()
            .filter(|stream| stream.name.starts_with(stream_prefix))
            .cloned()
            .collect())
    }

    fn fetch_events(
        &self,
        _log_group: &str,
        stream_name: &str,
    ) -> Result<Vec<LogEvent>, ProviderError> {
        self.events
            .get(stream_name)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Advances by a fixed step on every read.
pub struct SteppingClock {
    next: RefCell<DateTime<Utc>>,
    step: chrono::Duration,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>, step: chrono::Duration) -> Self {
        Self {
            next: RefCell::new(start),
            step,
        }
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::starting_at(at, chrono::Duration::zero())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.borrow_mut();
        let current = *next;
        *next = current + self.step;
        current
    }
}

#[derive(Default)]
pub struct RecordingPause {
    pauses: RefCell<Vec<Duration>>,
}

impl RecordingPause {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

/// Collects formatted subscriber output in memory.
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().expect("capture buffer poisoned");
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("capture buffer poisoned")
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedOutput {
    type Writer = CapturedOutput;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
