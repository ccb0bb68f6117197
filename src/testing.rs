//! Scripted in-memory `LogService` shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use crate::aws::LogService;
use crate::models::{LogEvent, Page, SendableError, StreamDescriptor};

type PageKey = (String, Option<String>);

/// Serves pre-scripted pages keyed by (resource, token) and records every call.
#[derive(Default)]
pub struct FakeLogs {
    pub groups: HashMap<Option<String>, Page<String>>,
    pub streams: HashMap<PageKey, Page<StreamDescriptor>>,
    pub events: HashMap<PageKey, Page<LogEvent>>,
    calls: Mutex<Vec<String>>,
    event_end_times: Mutex<Vec<Option<i64>>>,
}

impl FakeLogs {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn event_end_times(&self) -> Vec<Option<i64>> {
        self.event_end_times.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn missing(what: &str) -> SendableError {
    format!("ResourceNotFoundException: {} does not exist", what).into()
}

#[async_trait]
impl LogService for FakeLogs {
    async fn describe_log_groups(
        &self,
        name_prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, SendableError> {
        self.record(format!("groups {} {:?}", name_prefix, next_token));
        self.groups
            .get(&next_token)
            .cloned()
            .ok_or_else(|| missing("group page"))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StreamDescriptor>, SendableError> {
        self.record(format!("streams {} {:?}", log_group_name, next_token));
        self.streams
            .get(&(log_group_name.to_string(), next_token))
            .cloned()
            .ok_or_else(|| missing(log_group_name))
    }

    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        end_time: Option<i64>,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>, SendableError> {
        self.record(format!(
            "events {}/{} {:?}",
            log_group_name, log_stream_name, next_token
        ));
        self.event_end_times.lock().unwrap().push(end_time);
        self.events
            .get(&(log_stream_name.to_string(), next_token))
            .cloned()
            .ok_or_else(|| missing(log_stream_name))
    }
}

pub fn page<T>(items: Vec<T>, next: &str) -> Page<T> {
    Page {
        items,
        next_token: Some(next.to_string()),
    }
}

pub fn last_page<T>(items: Vec<T>) -> Page<T> {
    Page {
        items,
        next_token: None,
    }
}

pub fn stream(name: &str, last_event: Option<DateTime<Local>>) -> StreamDescriptor {
    StreamDescriptor {
        name: Some(name.to_string()),
        last_event_timestamp: last_event.map(|t| t.timestamp_millis()),
    }
}

pub fn event(timestamp: i64, message: &str) -> LogEvent {
    LogEvent {
        timestamp: Some(timestamp),
        message: Some(message.to_string()),
    }
}

pub fn now() -> DateTime<Local> {
    Local.timestamp_opt(1_700_000_000, 0).unwrap()
}
