use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::operation::describe_log_groups::DescribeLogGroupsOutput;
use aws_sdk_cloudwatchlogs::operation::describe_log_streams::DescribeLogStreamsOutput;
use aws_sdk_cloudwatchlogs::operation::get_log_events::GetLogEventsOutput;
use aws_sdk_cloudwatchlogs::Client;
use log::{debug, warn};

use crate::config::AppConfig;
use crate::models::{LogEvent, Page, SendableError, StreamDescriptor};

lazy_static! {
    static ref AWS_REGIONS: Vec<&'static str> = vec![
        "us-east-1", "us-east-2", "us-west-1", "us-west-2",
        "af-south-1", "ap-east-1", "ap-south-1", "ap-south-2",
        "ap-southeast-1", "ap-southeast-2", "ap-southeast-3",
        "ap-southeast-4", "ap-northeast-1", "ap-northeast-2",
        "ap-northeast-3", "ca-central-1", "ca-west-1",
        "eu-central-1", "eu-central-2", "eu-west-1", "eu-west-2",
        "eu-west-3", "eu-south-1", "eu-south-2", "eu-north-1",
        "il-central-1", "me-central-1", "me-south-1", "sa-east-1",
        "us-gov-east-1", "us-gov-west-1", "cn-north-1", "cn-northwest-1",
    ];
}

fn is_known_region(input: &str) -> bool {
    AWS_REGIONS.iter().any(|&region| region == input)
}

pub async fn build_config(app_config: &AppConfig) -> Result<SdkConfig, SendableError> {
    let mut loader = aws_config::from_env();

    if let Some(profile_name) = app_config.profile.clone() {
        loader = loader.profile_name(profile_name);
    }

    if !is_known_region(&app_config.region) {
        warn!("Region '{}' is not in the known region list, using it anyway", app_config.region);
    }
    loader = loader.region(Region::new(app_config.region.clone()));

    let shared_config = loader.load().await;
    Ok(shared_config)
}

/// The three paginated CloudWatch Logs reads this tool needs. Each call
/// fetches exactly one page; callers keep passing `next_token` back until it is `None`.
/// `get_log_events` reads forward from the head of the stream and excludes
/// events at or after `end_time` when one is given.
#[async_trait]
pub trait LogService: Send + Sync {
    async fn describe_log_groups(
        &self,
        name_prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, SendableError>;

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StreamDescriptor>, SendableError>;

    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        end_time: Option<i64>,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>, SendableError>;
}

pub struct CloudWatchLogs {
    client: Client,
}

impl CloudWatchLogs {
    pub fn new(config: &SdkConfig) -> Self {
        CloudWatchLogs {
            client: Client::new(config),
        }
    }
}

fn remote_error<E>(err: E) -> SendableError
where
    E: std::error::Error,
{
    DisplayErrorContext(err).to_string().into()
}

#[async_trait]
impl LogService for CloudWatchLogs {
    async fn describe_log_groups(
        &self,
        name_prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, SendableError> {
        let resp = self
            .client
            .describe_log_groups()
            .log_group_name_prefix(name_prefix)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(groups_page(resp))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StreamDescriptor>, SendableError> {
        let resp = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .descending(false)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(streams_page(resp))
    }

    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        end_time: Option<i64>,
        next_token: Option<String>,
    ) -> Result<Page<LogEvent>, SendableError> {
        let resp = self
            .client
            .get_log_events()
            .log_group_name(log_group_name)
            .log_stream_name(log_stream_name)
            .start_from_head(true)
            .set_end_time(end_time)
            .set_next_token(next_token.clone())
            .send()
            .await
            .map_err(remote_error)?;
        Ok(events_page(resp, next_token.as_deref()))
    }
}

fn groups_page(resp: DescribeLogGroupsOutput) -> Page<String> {
    let items = resp
        .log_groups
        .unwrap_or_default()
        .into_iter()
        .filter_map(|group| group.log_group_name)
        .collect();
    Page {
        items,
        next_token: resp.next_token,
    }
}

fn streams_page(resp: DescribeLogStreamsOutput) -> Page<StreamDescriptor> {
    let items = resp
        .log_streams
        .unwrap_or_default()
        .into_iter()
        .map(|stream| StreamDescriptor {
            name: stream.log_stream_name,
            last_event_timestamp: stream.last_event_timestamp,
        })
        .collect();
    Page {
        items,
        next_token: resp.next_token,
    }
}

// GetLogEvents never omits the forward token; the stream is exhausted once
// the service hands back the token we just sent.
fn events_page(resp: GetLogEventsOutput, sent_token: Option<&str>) -> Page<LogEvent> {
    let items: Vec<LogEvent> = resp
        .events
        .unwrap_or_default()
        .into_iter()
        .map(|event| LogEvent {
            timestamp: event.timestamp,
            message: event.message,
        })
        .collect();
    let next_token = resp
        .next_forward_token
        .filter(|token| Some(token.as_str()) != sent_token);
    debug!("Received {} event(s), more pages: {}", items.len(), next_token.is_some());
    Page { items, next_token }
}
