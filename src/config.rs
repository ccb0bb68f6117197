use std::ffi::OsString;

use chrono::{DateTime, Local, TimeDelta};
use clap::Parser;

use crate::models::SendableError;

/// Long options that may also be spelled with a single dash (`-hours 5`).
const SINGLE_DASH_OPTIONS: &[&str] = &["hours", "region", "profile"];

#[derive(Parser, Debug)]
#[command(
    name = "lambdalogs",
    version,
    about = "Print recent CloudWatch log events for an AWS Lambda function, or list functions with log groups."
)]
pub struct AppConfig {
    /// Number of hours to look back in lambda logs
    #[arg(long, default_value_t = 24, allow_negative_numbers = true)]
    pub hours: i64,

    /// AWS region
    #[arg(long, default_value = "us-west-2")]
    pub region: String,

    /// Shared config profile; the default credential chain is used when absent
    #[arg(long)]
    pub profile: Option<String>,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Lambda function name; omit to list functions
    pub function_name: Option<String>,

    /// Positional arguments after the function name are ignored
    #[arg(hide = true)]
    pub ignored_args: Vec<String>,
}

impl AppConfig {
    pub fn from_env_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn cutoff(&self, now: DateTime<Local>) -> Result<DateTime<Local>, SendableError> {
        TimeDelta::try_hours(self.hours)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| format!("--hours {} is out of range", self.hours).into())
    }
}

/// Rewrites `-hours`/`-hours=N` style options into their `--` form. Everything
/// after a bare `--` is passed through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or_default();
                    if SINGLE_DASH_OPTIONS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
