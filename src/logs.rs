use std::io::Write;

use chrono::{DateTime, Local, SecondsFormat};
use log::{debug, info};

use crate::aws::LogService;
use crate::models::{SendableError, LAMBDA_PREFIX};
use crate::utilities::millis_to_local;

pub fn log_group_name(function_name: &str) -> String {
    format!("{}{}", LAMBDA_PREFIX, function_name)
}

pub fn function_name_of(log_group_name: &str) -> &str {
    log_group_name
        .strip_prefix(LAMBDA_PREFIX)
        .unwrap_or(log_group_name)
}

/// Prints the function name of every `/aws/lambda/` log group, one per line.
pub async fn list_function_names<S, W>(service: &S, out: &mut W) -> Result<usize, SendableError>
where
    S: LogService + ?Sized,
    W: Write,
{
    let mut count = 0;
    let mut next_token = None;

    loop {
        let page = service.describe_log_groups(LAMBDA_PREFIX, next_token).await?;
        for group in &page.items {
            writeln!(out, "{}", function_name_of(group))?;
            count += 1;
        }

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    Ok(count)
}

/// Names of the streams in `log_group_name` whose last event is strictly after
/// `cutoff`, in the order the service lists them.
pub async fn find_recent_streams<S>(
    service: &S,
    log_group_name: &str,
    cutoff: DateTime<Local>,
) -> Result<Vec<String>, SendableError>
where
    S: LogService + ?Sized,
{
    let mut streams = Vec::new();
    let mut next_token = None;

    loop {
        let page = service
            .describe_log_streams(log_group_name, next_token)
            .await?;
        for stream in page.items {
            let recent = stream
                .last_event_timestamp
                .is_some_and(|millis| millis_to_local(millis) > cutoff);
            match stream.name {
                Some(name) if recent => streams.push(name),
                Some(name) => debug!("Skipping stale stream {}", name),
                None => {}
            }
        }

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    Ok(streams)
}

/// Writes `<millis> <message>` for every event in the stream before `end_time`.
/// Messages carry their own line endings, so nothing is appended.
pub async fn print_stream_events<S, W>(
    service: &S,
    log_group_name: &str,
    log_stream_name: &str,
    end_time: Option<i64>,
    out: &mut W,
) -> Result<usize, SendableError>
where
    S: LogService + ?Sized,
    W: Write,
{
    let mut count = 0;
    let mut next_token = None;

    loop {
        let page = service
            .get_log_events(log_group_name, log_stream_name, end_time, next_token)
            .await?;
        for event in &page.items {
            write!(
                out,
                "{} {}",
                event.timestamp.unwrap_or_default(),
                event.message.as_deref().unwrap_or_default()
            )?;
            count += 1;
        }

        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }
    Ok(count)
}

pub fn stream_search_message(group_name: &str, cutoff: DateTime<Local>) -> String {
    format!(
        "Finding streams for {} with last event time after {}",
        group_name,
        cutoff.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}

pub fn stream_fetch_message(group_name: &str, stream_name: &str) -> String {
    format!("Getting log events in {}/{}", group_name, stream_name)
}

/// Prints the events of every stream in the function's log group that saw
/// activity after `cutoff`. Event reads stop at `until` so live streams end.
pub async fn print_function_logs<S, W>(
    service: &S,
    function_name: &str,
    cutoff: DateTime<Local>,
    until: DateTime<Local>,
    out: &mut W,
) -> Result<usize, SendableError>
where
    S: LogService + ?Sized,
    W: Write,
{
    let group_name = log_group_name(function_name);
    info!("{}", stream_search_message(&group_name, cutoff));
    let streams = find_recent_streams(service, &group_name, cutoff).await?;
    debug!("{} stream(s) with recent events", streams.len());

    let end_time = Some(until.timestamp_millis());
    let mut total = 0;
    for stream_name in &streams {
        info!("{}", stream_fetch_message(&group_name, stream_name));
        total += print_stream_events(service, &group_name, stream_name, end_time, out).await?;
    }
    Ok(total)
}
