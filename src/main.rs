#[macro_use]
extern crate lazy_static;

mod aws;
mod config;
mod logs;
mod models;
#[cfg(test)]
mod testing;
mod utilities;

use crate::aws::{CloudWatchLogs, LogService};
use crate::models::SendableError;
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use config::AppConfig;
use log::{debug, error, info, Level};
use std::io::Write;
use std::time::SystemTime;

fn colored_level(level: Level) -> ColoredString {
    let name = level.to_string();
    match level {
        Level::Error => name.red().bold(),
        Level::Warn => name.yellow(),
        Level::Info => name.green(),
        Level::Debug | Level::Trace => name.dimmed(),
    }
}

pub fn setup_logger(verbose: bool) -> Result<(), SendableError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colored_level(record.level()),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Warn)
        .level_for(env!("CARGO_CRATE_NAME"), level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let app_config = AppConfig::from_env_args();
    if let Err(e) = setup_logger(app_config.verbose) {
        eprintln!("exiting on error: {}", e);
        std::process::exit(1);
    }
    debug!("Starting application with args: {:?}", app_config);

    let mut stdout = std::io::stdout().lock();
    let result = run(&app_config, &mut stdout).await;
    let flushed = stdout.flush();

    if let Err(e) = result.and(flushed.map_err(SendableError::from)) {
        error!("exiting on error: {}", e);
        std::process::exit(1);
    }
}

async fn run<W: Write>(app_config: &AppConfig, out: &mut W) -> Result<(), SendableError> {
    let config = aws::build_config(app_config).await?;
    let service = CloudWatchLogs::new(&config);
    dispatch(&service, app_config, Local::now(), out).await
}

/// Lists functions when no function name was given, otherwise prints the
/// function's recent events.
async fn dispatch<S, W>(
    service: &S,
    app_config: &AppConfig,
    now: DateTime<Local>,
    out: &mut W,
) -> Result<(), SendableError>
where
    S: LogService + ?Sized,
    W: Write,
{
    if !app_config.ignored_args.is_empty() {
        debug!("Ignoring extra arguments: {:?}", app_config.ignored_args);
    }

    let Some(function_name) = app_config.function_name() else {
        info!(
            "No function argument given, listing functions in {}:",
            app_config.region
        );
        let count = logs::list_function_names(service, out).await?;
        debug!("Listed {} function(s)", count);
        return Ok(());
    };

    let cutoff = app_config.cutoff(now)?;
    let count = logs::print_function_logs(service, function_name, cutoff, now, out).await?;
    debug!("Printed {} event(s)", count);
    Ok(())
}
